pub mod main_page;
