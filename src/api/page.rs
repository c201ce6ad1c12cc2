//! HTML document for the relay page.

use crate::domain::model::{ControlList, OutputFormat, RawQuery, RenderedOutput, LIMIT_MAX, LIMIT_MIN};
use crate::utils::error::RelayError;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

/// What goes under "Requested Information".
pub enum PageContent<'a> {
    /// First visit, nothing requested yet.
    FormOnly,
    Output(&'a RenderedOutput),
    Error(&'a RelayError),
}

pub fn render_page(raw: &RawQuery, content: PageContent<'_>) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str(
        "<html>\n\
         <head>\n\
         <title>Brevet Control List</title>\n\
         </head>\n\
         <body>\n\
         <h1>GET Control Information</h1>\n",
    );
    render_form(&mut html, raw);
    html.push_str("<h2>Requested Information</h2>\n");

    match content {
        PageContent::FormOnly => {}
        PageContent::Output(RenderedOutput::Json(body)) => {
            html.push_str(&encode_text(body));
            html.push('\n');
        }
        PageContent::Output(RenderedOutput::Csv(records)) => {
            for record in records {
                let _ = writeln!(html, "<p> {} </p>", encode_text(&record.to_string()));
            }
        }
        PageContent::Error(err) => {
            let _ = writeln!(
                html,
                "<p class=\"error\">{}</p>\n<p class=\"hint\">{}</p>",
                encode_text(&err.user_friendly_message()),
                encode_text(err.recovery_suggestion())
            );
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, raw: &RawQuery) {
    html.push_str("<form action=\"\" method=\"GET\">\n");

    html.push_str("<label>Control List</label>\n<select name=\"control_list\" id=\"control_list\">\n");
    for list in ControlList::ALL {
        push_option(html, list.as_str(), list.label(), raw.control_list.as_deref());
    }
    html.push_str("</select>\n");

    html.push_str("<label>Format</label>\n<select name=\"format\" id=\"format\">\n");
    for format in OutputFormat::ALL {
        push_option(html, format.as_str(), format.label(), raw.format.as_deref());
    }
    html.push_str("</select>\n");

    let _ = writeln!(
        html,
        "<label>Limit</label>\n\
         <input type=\"number\" name=\"limit\" id=\"limit\" min=\"{}\" max=\"{}\" step=\"1\" value=\"{}\">",
        LIMIT_MIN,
        LIMIT_MAX,
        encode_double_quoted_attribute(raw.limit.as_deref().unwrap_or(""))
    );

    html.push_str("<input type=\"submit\" value=\"Submit\">\n</form>\n");
}

fn push_option(html: &mut String, value: &str, label: &str, selected: Option<&str>) {
    let marker = if selected == Some(value) { " selected" } else { "" };
    let _ = writeln!(html, "<option value=\"{}\"{}>{}</option>", value, marker, label);
}
