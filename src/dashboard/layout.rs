//! Page Layout
//!
//! A declarative element tree describing the page, served as JSON and
//! rendered to a single HTML document. The page talks to the server over
//! the `/ws` session and redraws only the outputs it is sent.

use serde::Serialize;
use std::fmt;

use super::context::DashboardContext;
use super::controls::{ControlId, OutputId};

pub const PAGE_TITLE: &str = "County Atlas";
pub const MAPS_HEADING: &str = "Compare Two Maps of the US";
pub const SCATTER_HEADING: &str = "The Impact of Student Instruction Spending";
pub const INSIGHTS_HEADING: &str = "Data Insights";

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// CSS `white-space` for text outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhiteSpace {
    Pre,
    PreWrap,
}

impl WhiteSpace {
    fn css(&self) -> &'static str {
        match self {
            WhiteSpace::Pre => "pre",
            WhiteSpace::PreWrap => "pre-wrap",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadioOption {
    pub label: String,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Element {
    Heading {
        level: u8,
        text: String,
    },
    Graph {
        id: OutputId,
        scroll_zoom: bool,
    },
    Dropdown {
        id: ControlId,
        label: String,
        options: Vec<String>,
        value: String,
    },
    Radio {
        id: ControlId,
        label: String,
        options: Vec<RadioOption>,
        value: bool,
    },
    Text {
        id: OutputId,
        white_space: WhiteSpace,
    },
    Container {
        class: String,
        children: Vec<Element>,
    },
}

impl Element {
    fn container(class: &str, children: Vec<Element>) -> Self {
        Element::Container {
            class: class.to_string(),
            children,
        }
    }

    fn heading(level: u8, text: &str) -> Self {
        Element::Heading {
            level,
            text: text.to_string(),
        }
    }

    /// Depth-first visit of this element and its children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        if let Element::Container { children, .. } = self {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

/// Build the page tree with controls set to the context defaults
pub fn build_layout(ctx: &DashboardContext) -> Element {
    let state = ctx.default_state();
    let map_options = ctx.map_options();

    let maps = Element::container(
        "section",
        vec![
            Element::heading(2, MAPS_HEADING),
            Element::container(
                "row maps",
                vec![
                    Element::Graph {
                        id: OutputId::Map1,
                        scroll_zoom: false,
                    },
                    Element::Graph {
                        id: OutputId::Map2,
                        scroll_zoom: false,
                    },
                ],
            ),
            Element::container(
                "row controls",
                vec![
                    Element::Dropdown {
                        id: ControlId::Map1Dropdown,
                        label: "Map 1".to_string(),
                        options: map_options.clone(),
                        value: state.map_1.clone(),
                    },
                    Element::Dropdown {
                        id: ControlId::Map2Dropdown,
                        label: "Map 2".to_string(),
                        options: map_options,
                        value: state.map_2.clone(),
                    },
                ],
            ),
        ],
    );

    let scatter = Element::container(
        "section",
        vec![
            Element::heading(2, SCATTER_HEADING),
            Element::Graph {
                id: OutputId::Scatter,
                scroll_zoom: true,
            },
            Element::container(
                "row",
                vec![
                    Element::container(
                        "column",
                        vec![
                            Element::Dropdown {
                                id: ControlId::ScatterDropdown,
                                label: "y-Axis Data Source".to_string(),
                                options: ctx.scatter_options(),
                                value: state.scatter_y.clone(),
                            },
                            Element::Radio {
                                id: ControlId::LogitRadio,
                                label: "Logistic y-Scale (For Percentage Values)".to_string(),
                                options: [true, false]
                                    .into_iter()
                                    .map(|value| RadioOption {
                                        label: if value { "True" } else { "False" }.to_string(),
                                        value,
                                    })
                                    .collect(),
                                value: state.logit,
                            },
                        ],
                    ),
                    Element::Text {
                        id: OutputId::Summary,
                        white_space: WhiteSpace::Pre,
                    },
                ],
            ),
        ],
    );

    let insights = Element::container(
        "section",
        vec![
            Element::heading(4, INSIGHTS_HEADING),
            Element::Text {
                id: OutputId::DataInsights,
                white_space: WhiteSpace::PreWrap,
            },
        ],
    );

    Element::container("page", vec![maps, scatter, insights])
}

/// Render the full HTML document
pub fn render_page(layout: &Element) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{plotly}"></script>
<style>{style}</style>
</head>
<body>
{body}
<script>{script}</script>
</body>
</html>
"#,
        title = PAGE_TITLE,
        plotly = PLOTLY_CDN,
        style = STYLE,
        body = Markup(layout),
        script = CLIENT_SCRIPT,
    )
}

/// HTML markup of an element subtree
struct Markup<'a>(&'a Element);

impl fmt::Display for Markup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Element::Heading { level, text } => {
                writeln!(f, "<h{l}>{}</h{l}>", escape_html(text), l = level)
            }
            Element::Graph { id, scroll_zoom } => writeln!(
                f,
                r#"<div class="graph" id="{}" data-scroll-zoom="{}"></div>"#,
                id, scroll_zoom
            ),
            Element::Dropdown {
                id,
                label,
                options,
                value,
            } => {
                write!(
                    f,
                    r#"<label>{}<select class="control" id="{}">"#,
                    escape_html(label),
                    id
                )?;
                for option in options {
                    let selected = if option == value { " selected" } else { "" };
                    let escaped = escape_html(option);
                    write!(
                        f,
                        r#"<option value="{}"{}>{}</option>"#,
                        escaped, selected, escaped
                    )?;
                }
                writeln!(f, "</select></label>")
            }
            Element::Radio {
                id,
                label,
                options,
                value,
            } => {
                write!(
                    f,
                    r#"<fieldset class="control radio" id="{}"><legend>{}</legend>"#,
                    id,
                    escape_html(label)
                )?;
                for option in options {
                    let checked = if option.value == *value { " checked" } else { "" };
                    write!(
                        f,
                        r#"<label><input type="radio" name="{}" value="{}"{}>{}</label>"#,
                        id,
                        option.value,
                        checked,
                        escape_html(&option.label)
                    )?;
                }
                writeln!(f, "</fieldset>")
            }
            Element::Text { id, white_space } => writeln!(
                f,
                r#"<div class="text" id="{}" style="white-space: {}"></div>"#,
                id,
                white_space.css()
            ),
            Element::Container { class, children } => {
                writeln!(f, r#"<div class="{}">"#, escape_html(class))?;
                for child in children {
                    write!(f, "{}", Markup(child))?;
                }
                writeln!(f, "</div>")
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 5%; }
h2, h4 { display: flex; justify-content: center; }
.row { display: flex; flex-direction: row; justify-content: space-around; align-items: start; }
.maps .graph { width: 48%; }
#scatter { width: 90%; margin: auto; }
#summary { font-family: Monaco, monospace; font-size: 1vw; }
#data-insights { width: 70%; margin: auto; }
.notice { color: #a33; font-style: italic; }
"#;

const CLIENT_SCRIPT: &str = r#"
(function () {
  const scheme = location.protocol === "https:" ? "wss" : "ws";
  const socket = new WebSocket(scheme + "://" + location.host + "/ws");

  function render(update) {
    const el = document.getElementById(update.output);
    if (!el) return;
    const content = update.content;
    if (content.kind === "figure") {
      if (el.classList.contains("notice")) {
        el.classList.remove("notice");
        el.textContent = "";
      }
      const zoom = el.dataset.scrollZoom === "true";
      Plotly.react(el, content.value.data, content.value.layout, { scrollZoom: zoom });
    } else {
      if (el.classList.contains("graph")) Plotly.purge(el);
      el.classList.toggle("notice", content.kind === "notice");
      el.textContent = content.value;
    }
  }

  socket.addEventListener("open", function () {
    socket.send(JSON.stringify({ type: "init" }));
  });

  socket.addEventListener("message", function (event) {
    const message = JSON.parse(event.data);
    if (message.type === "update") {
      message.outputs.forEach(render);
    } else if (message.type === "error") {
      console.error(message.message);
    }
  });

  document.querySelectorAll("select.control").forEach(function (select) {
    select.addEventListener("change", function () {
      socket.send(JSON.stringify({ type: "set_control", control: select.id, value: select.value }));
    });
  });

  document.querySelectorAll("fieldset.radio").forEach(function (group) {
    group.addEventListener("change", function (event) {
      const value = event.target.value === "true";
      socket.send(JSON.stringify({ type: "set_control", control: group.id, value: value }));
    });
  });
})();
"#;
