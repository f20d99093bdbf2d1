use iocraft::prelude::*;

#[derive(Default, Props)]
pub struct EchoBlockProps {
    pub content: String,
}

#[component]
pub fn EchoBlock(props: &EchoBlockProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(
            margin_top: 1,
            border_style: BorderStyle::Single,
            border_color: Color::DarkGrey,
            padding_left: 1,
            padding_right: 1,
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Start,
        ) {
            Text(content: props.content.clone(), color: Color::Green, align: TextAlign::Left)
        }
    }
}
