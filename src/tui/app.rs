use std::path::Path;

use iocraft::prelude::*;

use crate::tui::AppContext;
use crate::tui::pages::main_page::MainPage;

/// Header printed once above the rendered area.
fn banner_lines(base_url: &str, log_path: &Path) -> Vec<String> {
    vec![
        "\x1b[1;34mechoview\x1b[0m".to_string(),
        format!("backend: {base_url} · Enter send · Esc quit"),
        format!("\x1b[90mlog: {}\x1b[0m", log_path.display()),
        String::new(),
    ]
}

#[component]
pub fn App(mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let (stdout, _stderr) = hooks.use_output();
    let header_rendered = hooks.use_state(|| false);

    let lines = {
        let app_ctx = hooks.use_context::<AppContext>();
        banner_lines(&app_ctx.base_url, &app_ctx.log_path)
    };

    // Output welcome header once.
    let mut header_rendered_clone = header_rendered;
    hooks.use_future(async move {
        if !*header_rendered_clone.read() {
            for line in lines {
                stdout.println(line);
            }
            header_rendered_clone.set(true);
        }
    });

    element! {
        MainPage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_backend_keys_and_log_file() {
        let lines = banner_lines("http://localhost:5000", Path::new("/tmp/echoview.log"));
        assert!(lines[1].contains("http://localhost:5000"));
        assert!(lines[1].contains("Enter send · Esc quit"));
        assert!(lines[2].contains("/tmp/echoview.log"));
        assert!(!lines.concat().contains("发送"));
    }
}
