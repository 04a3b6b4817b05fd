//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::html_escape;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            highlight: config.enable,
            line_numbers: config.line_number,
        }
    }

    /// Render markdown to HTML
    ///
    /// Headings without an explicit `{#id}` get an id slugged from their
    /// text, made unique within the document.
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is handled separately in FrontMatter::parse()
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut used_ids: HashMap<String, usize> = HashMap::new();

        let mut code_block: Option<(Option<String>, String)> = None;
        let mut heading: Option<(usize, Vec<Event>, String)> = None;

        for event in parser {
            // Inside a fenced or indented code block: collect raw text
            if let Some((lang, content)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => content.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let html = self.highlight_code(content, lang.as_deref());
                        events.push(Event::Html(CowStr::from(html)));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            // Inside a heading: buffer events until we know its text
            if let Some((start, buffered, text)) = heading.as_mut() {
                match event {
                    Event::End(TagEnd::Heading(_)) => {
                        let start_event = events.remove(*start);
                        let start_event = match start_event {
                            Event::Start(Tag::Heading {
                                level,
                                id: None,
                                classes,
                                attrs,
                            }) => Event::Start(Tag::Heading {
                                level,
                                id: Some(CowStr::from(unique_id(&mut used_ids, text))),
                                classes,
                                attrs,
                            }),
                            other => other,
                        };
                        events.insert(*start, start_event);
                        events.append(buffered);
                        events.push(event);
                        heading = None;
                    }
                    Event::Text(ref t) | Event::Code(ref t) => {
                        text.push_str(t);
                        buffered.push(event);
                    }
                    other => buffered.push(other),
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .filter(|l| !l.is_empty())
                            .map(|l| l.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(Tag::Heading { .. }) => {
                    heading = Some((events.len(), Vec::new(), String::new()));
                    events.push(event);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let class = html_escape(lang);

        let theme = self.theme_set.themes.get(&self.theme_name).or_else(|| {
            tracing::debug!("Unknown highlight theme {:?}", self.theme_name);
            self.theme_set.themes.values().next()
        });

        let highlighted = match theme {
            Some(theme) if self.highlight => {
                let syntax = self
                    .syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
                    .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            }
            _ => None,
        };

        match highlighted {
            Some(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, &class),
            Some(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                class, highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                class,
                html_escape(code)
            ),
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            lang,
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Slug a heading and suffix repeats (`costs`, `costs-1`, ...)
fn unique_id(used: &mut HashMap<String, usize>, text: &str) -> String {
    let base = slug::slugify(text.trim());
    let base = if base.is_empty() {
        "section".to_string()
    } else {
        base
    };
    let seen = used.entry(base.clone()).or_insert(0);
    let id = if *seen == 0 {
        base
    } else {
        format!("{}-{}", base, seen)
    };
    *seen += 1;
    id
}

/// Remove MDX module lines (`import ...` / `export ...`) outside code fences
pub fn strip_mdx_module_lines(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fence: Option<&str> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        match (fence, marker) {
            (None, Some(m)) => fence = Some(m),
            (Some(open), Some(m)) if open == m => fence = None,
            (None, None) if line.starts_with("import ") || line.starts_with("export ") => {
                continue;
            }
            _ => {}
        }

        out.push_str(line);
        out.push('\n');
    }

    out
}
