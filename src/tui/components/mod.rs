pub mod echo_block;
pub mod heading;
pub mod input_section;
pub mod status_line;
