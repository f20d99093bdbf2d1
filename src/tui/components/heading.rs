use iocraft::prelude::*;

#[derive(Default, Props)]
pub struct HeadingProps {
    pub text: String,
}

/// Greeting line. Rendered even when empty so the layout doesn't jump.
#[component]
pub fn Heading(props: &HeadingProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(margin_bottom: 1, min_height: 1) {
            Text(content: props.text.clone(), color: Color::Blue, weight: Weight::Bold)
        }
    }
}
