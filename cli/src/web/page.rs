use medcrew_core::CarePlan;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use std::fmt::Write;

pub const PAGE_TITLE: &str = "AI-Powered Medical Diagnosis & Treatment";
pub const SUBMIT_LABEL: &str = "Get Diagnosis and Treatment Plan";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #262730; }
label { display: block; font-weight: 600; margin: 1rem 0 .4rem; }
textarea { width: 100%; min-height: 7rem; padding: .6rem; font: inherit; box-sizing: border-box; }
button { margin-top: 1rem; padding: .6rem 1.2rem; font: inherit; cursor: pointer; }
.notice { padding: .8rem 1rem; border-radius: .4rem; margin: 1rem 0; }
.warning { background: #fffce7; color: #926c05; }
.error { background: #ffecec; color: #7d353b; }
.section-body { line-height: 1.5; }
.download { display: inline-block; margin: 1.5rem 0; }
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

/// Values echoed back into the form.
#[derive(Debug, Clone, Default)]
pub struct FormValues<'a> {
    pub symptoms: &'a str,
    pub medical_history: &'a str,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn is_safe_url(url: &str) -> bool {
    let scheme = url.trim_start().to_ascii_lowercase();
    !["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|unsafe_scheme| scheme.starts_with(unsafe_scheme))
}

/// Renders model-written Markdown. Raw HTML is shown as text and script-like
/// link targets are dropped.
pub fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let events = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed(""),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape_html(PAGE_TITLE),
    )
}

fn form(values: &FormValues<'_>) -> String {
    format!(
        "<form method=\"post\" action=\"/diagnose\">\n\
         <label for=\"symptoms\">Enter Patient Symptoms:</label>\n\
         <textarea id=\"symptoms\" name=\"symptoms\">\n{}</textarea>\n\
         <label for=\"medical_history\">Enter Medical History:</label>\n\
         <textarea id=\"medical_history\" name=\"medical_history\">\n{}</textarea>\n\
         <button type=\"submit\">{}</button>\n\
         <p><small>Generating recommendations can take a minute.</small></p>\n\
         </form>",
        escape_html(values.symptoms),
        escape_html(values.medical_history),
        SUBMIT_LABEL
    )
}

fn notice(notice: &Notice) -> String {
    let (class, message) = match notice {
        Notice::Warning(message) => ("warning", message),
        Notice::Error(message) => ("error", message),
    };
    format!(
        "<div class=\"notice {}\" role=\"alert\">{}</div>",
        class,
        escape_html(message)
    )
}

pub fn render_form(values: &FormValues<'_>, status: Option<&Notice>) -> String {
    let mut body = form(values);
    if let Some(status) = status {
        body.push('\n');
        body.push_str(&notice(status));
    }
    layout(&body)
}

/// The form followed by the three care-plan sections and the DOCX download
/// anchor. `download_link` is trusted markup.
pub fn render_result(values: &FormValues<'_>, plan: &CarePlan, download_link: &str) -> String {
    let mut body = form(values);
    for (title, text) in plan.sections() {
        let _ = write!(
            body,
            "\n<section>\n<h2>{}:</h2>\n<div class=\"section-body\">{}</div>\n</section>",
            escape_html(title),
            render_markdown(text)
        );
    }
    let _ = write!(body, "\n<div class=\"download\">{}</div>", download_link);
    layout(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<script>\"x\" & 'y'</script>"),
            "&lt;script&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn form_page_has_inputs_and_button() {
        let html = render_form(&FormValues::default(), None);
        assert!(html.contains("<title>AI-Powered Medical Diagnosis &amp; Treatment</title>"));
        assert!(html.contains("Enter Patient Symptoms:"));
        assert!(html.contains("Enter Medical History:"));
        assert!(html.contains(SUBMIT_LABEL));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn echoes_values_escaped_with_notice() {
        let values = FormValues {
            symptoms: "</textarea><b>",
            medical_history: "",
        };
        let html = render_form(&values, Some(&Notice::Warning("Please enter both.".into())));
        assert!(html.contains("&lt;/textarea&gt;&lt;b&gt;"));
        assert!(html.contains("<div class=\"notice warning\" role=\"alert\">Please enter both.</div>"));
    }

    #[test]
    fn leading_newline_survives_the_textarea() {
        let values = FormValues {
            symptoms: "\nfever",
            medical_history: "none",
        };
        let html = render_form(&values, None);
        assert!(html.contains("name=\"symptoms\">\n\nfever</textarea>"));
        assert!(html.contains("name=\"medical_history\">\nnone</textarea>"));
    }

    #[test]
    fn markdown_is_rendered() {
        let html = render_markdown("### Likely\n\n- **Migraine**\n- Tension headache");
        assert!(html.contains("<h3>Likely</h3>"));
        assert!(html.contains("<li><strong>Migraine</strong></li>"));
    }

    #[test]
    fn raw_html_in_markdown_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>\n\nSee <b>this</b>.");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;this&lt;/b&gt;"));
    }

    #[test]
    fn script_links_are_neutralized() {
        let html = render_markdown("[click](javascript:alert(1)) and [NHS](https://www.nhs.uk)");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("<a href=\"#\">click</a>"));
        assert!(html.contains("<a href=\"https://www.nhs.uk\">NHS</a>"));
    }

    #[test]
    fn result_page_lists_sections_in_order() {
        let plan = CarePlan {
            diagnosis: "Migraine <likely>".into(),
            treatment: "Rest".into(),
            tests: "MRI".into(),
        };
        let html = render_result(&FormValues::default(), &plan, "<a href=\"#\">dl</a>");
        let d = html.find("<h2>Diagnosis:</h2>").unwrap();
        let t = html.find("<h2>Treatment Plan:</h2>").unwrap();
        let r = html.find("<h2>Recommended Tests:</h2>").unwrap();
        assert!(d < t && t < r);
        assert!(html.contains("Migraine &lt;likely&gt;"));
        assert!(html.contains("<div class=\"download\"><a href=\"#\">dl</a></div>"));
    }
}
