use iocraft::prelude::*;

#[derive(Default, Props)]
pub struct InputSectionProps {
    pub value: String,
    pub width: u16,
}

/// Text field plus the send trigger. Key handling lives in the page that owns the text.
#[component]
pub fn InputSection(props: &InputSectionProps) -> impl Into<AnyElement<'static>> {
    let display = format!("{}│", props.value);
    let button = " Send POST ⏎ ";
    // Leave room for the button and both borders.
    let field_width = props
        .width
        .saturating_sub(button.chars().count() as u16 + 4)
        .max(10);

    element! {
        View(flex_direction: FlexDirection::Row, align_items: AlignItems::Center) {
            View(
                border_style: BorderStyle::Round,
                border_color: Color::Yellow,
                padding_left: 1,
                padding_right: 1,
                width: field_width,
            ) {
                Text(content: display)
            }
            View(
                border_style: BorderStyle::Round,
                border_color: Color::Cyan,
                margin_left: 1,
            ) {
                Text(content: button.to_string(), color: Color::Cyan, weight: Weight::Bold)
            }
        }
    }
}
