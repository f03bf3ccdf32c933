//! Just enough wikitext to find templates and rewrite their parameters.
//!
//! A [`Document`] is parsed once. Templates are located by byte span, read
//! through [`TemplateView`] and changed by collecting writes into a
//! [`TemplateEdit`] that [`Document::apply`] turns into new page text in one
//! pass. Text outside the written parameter values is copied through
//! untouched, including the whitespace around each rewritten value.
//!
//! Nesting of `{{ }}` and `[[ ]]` is tracked so pipes inside inner templates
//! or links do not split parameters. HTML comments are skipped.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Param {
    name: String,
    value: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Template {
    name: String,
    span: Range<usize>,
    /// Byte offset of the closing `}}`.
    close: usize,
    params: Vec<Param>,
}

impl Template {
    /// The effective parameter for `name`: the last one wins, as on the wiki.
    fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().rev().find(|p| p.name == name)
    }
}

/// A parsed page.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    templates: Vec<Template>,
}

/// Read-only view of one template inside a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateView<'a> {
    doc: &'a Document,
    index: usize,
}

/// A batch of parameter writes for one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEdit {
    template: usize,
    writes: Vec<(String, String)>,
}

fn normalize_name(name: &str) -> String {
    name.trim().replace('_', " ")
}

fn comment_end(bytes: &[u8], start: usize) -> usize {
    bytes[start + 4..]
        .windows(3)
        .position(|w| w == b"-->")
        .map(|p| start + 4 + p + 3)
        .unwrap_or(bytes.len())
}

fn is_pair(bytes: &[u8], i: usize, c: u8) -> bool {
    bytes[i] == c && bytes.get(i + 1) == Some(&c)
}

/// First top-level `=` inside `range`, if the parameter is named.
fn find_equals(bytes: &[u8], range: Range<usize>) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = range.start;
    while i < range.end {
        if bytes[i..range.end].starts_with(b"<!--") {
            i = comment_end(bytes, i);
        } else if is_pair(bytes, i, b'{') || is_pair(bytes, i, b'[') {
            depth += 1;
            i += 2;
        } else if is_pair(bytes, i, b'}') || is_pair(bytes, i, b']') {
            depth = depth.saturating_sub(1);
            i += 2;
        } else if bytes[i] == b'=' && depth == 0 {
            return Some(i);
        } else {
            i += 1;
        }
    }
    None
}

/// Parse the template opening at `start` (which must point at `{{`).
fn scan_template(text: &str, start: usize) -> Option<Template> {
    let bytes = text.as_bytes();
    let mut braces = 0usize;
    let mut links = 0usize;
    let mut pipes = Vec::new();
    let mut i = start + 2;

    let close = loop {
        if i >= bytes.len() {
            return None;
        }
        if bytes[i..].starts_with(b"<!--") {
            i = comment_end(bytes, i);
        } else if is_pair(bytes, i, b'{') {
            braces += 1;
            i += 2;
        } else if is_pair(bytes, i, b'}') {
            if braces == 0 {
                break i;
            }
            braces -= 1;
            i += 2;
        } else if is_pair(bytes, i, b'[') {
            links += 1;
            i += 2;
        } else if is_pair(bytes, i, b']') && links > 0 {
            links -= 1;
            i += 2;
        } else if bytes[i] == b'|' && braces == 0 && links == 0 {
            pipes.push(i);
            i += 1;
        } else {
            i += 1;
        }
    };

    let name_end = pipes.first().copied().unwrap_or(close);
    let mut params = Vec::with_capacity(pipes.len());
    let mut positional = 0u32;
    for (n, &pipe) in pipes.iter().enumerate() {
        let end = pipes.get(n + 1).copied().unwrap_or(close);
        let segment = pipe + 1..end;
        let param = match find_equals(bytes, segment.clone()) {
            Some(eq) => Param {
                name: text[segment.start..eq].trim().to_string(),
                value: eq + 1..end,
            },
            None => {
                positional += 1;
                Param {
                    name: positional.to_string(),
                    value: segment,
                }
            }
        };
        params.push(param);
    }

    Some(Template {
        name: normalize_name(&text[start + 2..name_end]),
        span: start..close + 2,
        close,
        params,
    })
}

impl Document {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let bytes = text.as_bytes();
        let mut templates = Vec::new();
        let mut i = 0;
        while i + 1 < bytes.len() {
            if bytes[i..].starts_with(b"<!--") {
                i = comment_end(bytes, i);
                continue;
            }
            if is_pair(bytes, i, b'{') {
                if let Some(template) = scan_template(&text, i) {
                    templates.push(template);
                }
                // Keep scanning inside so nested templates are found too.
                i += 2;
                continue;
            }
            i += 1;
        }
        Self { text, templates }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every template on the page named `name`, in page order.
    pub fn find_templates(&self, name: &str) -> Vec<TemplateView<'_>> {
        let wanted = normalize_name(name);
        self.templates
            .iter()
            .enumerate()
            .filter(|(_, t)| t.name == wanted)
            .map(|(index, _)| TemplateView { doc: self, index })
            .collect()
    }

    /// Page text with every write in `edit` applied. `edit` must have been
    /// started from a view of this document.
    ///
    /// Existing parameters keep the whitespace around their value; missing
    /// ones are appended before the closing braces.
    pub fn apply(&self, edit: &TemplateEdit) -> String {
        let template = &self.templates[edit.template];

        let mut splices: Vec<(Range<usize>, String)> = Vec::new();
        let mut appended = String::new();
        let multiline = self.text[..template.close].ends_with('\n');

        for (field, value) in &edit.writes {
            match template.param(field) {
                Some(param) => {
                    let old = &self.text[param.value.clone()];
                    let (lead, trail) = if old.trim().is_empty() {
                        ("", old)
                    } else {
                        (
                            &old[..old.len() - old.trim_start().len()],
                            &old[old.trim_end().len()..],
                        )
                    };
                    splices.push((param.value.clone(), format!("{lead}{value}{trail}")));
                }
                None => {
                    appended.push_str(&format!("|{field}={value}"));
                    if multiline {
                        appended.push('\n');
                    }
                }
            }
        }
        splices.sort_by_key(|(range, _)| range.start);

        let mut out = String::with_capacity(self.text.len() + appended.len());
        let mut cursor = 0;
        for (range, replacement) in splices {
            out.push_str(&self.text[cursor..range.start]);
            out.push_str(&replacement);
            cursor = range.end;
        }
        out.push_str(&self.text[cursor..template.close]);
        out.push_str(&appended);
        out.push_str(&self.text[template.close..]);
        out
    }

    /// Page text with the given template laid out one parameter per line.
    pub fn relayout(&self, view: TemplateView<'_>) -> String {
        let template = &self.templates[view.index];
        let fields = view.fields();
        let rendered = render_template_multiline(&template.name, &fields);
        format!(
            "{}{}{}",
            &self.text[..template.span.start],
            rendered,
            &self.text[template.span.end..]
        )
    }
}

impl<'a> TemplateView<'a> {
    fn template(&self) -> &'a Template {
        &self.doc.templates[self.index]
    }

    pub fn name(&self) -> &'a str {
        &self.template().name
    }

    /// Trimmed value of parameter `field`.
    pub fn get(&self, field: &str) -> Option<&'a str> {
        let doc = self.doc;
        self.template()
            .param(field)
            .map(|p| doc.text[p.value.clone()].trim())
    }

    pub fn has(&self, field: &str) -> bool {
        self.template().param(field).is_some()
    }

    /// All parameters as `(name, trimmed value)`, in page order.
    pub fn fields(&self) -> Vec<(&'a str, &'a str)> {
        let doc = self.doc;
        self.template()
            .params
            .iter()
            .map(|p| (p.name.as_str(), doc.text[p.value.clone()].trim()))
            .collect()
    }

    /// Raw source of the whole template, braces included.
    pub fn source(&self) -> &'a str {
        let doc = self.doc;
        &doc.text[self.template().span.clone()]
    }

    /// Start an empty edit batch for this template.
    pub fn edit(&self) -> TemplateEdit {
        TemplateEdit {
            template: self.index,
            writes: Vec::new(),
        }
    }
}

impl TemplateEdit {
    /// Queue a write. A later write to the same field replaces an earlier one.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.writes.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.writes.push((field, value)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Names of the queued fields, in write order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.writes.iter().map(|(f, _)| f.as_str())
    }
}

fn push_param(out: &mut String, name: &str, value: &str) {
    out.push('|');
    if name.parse::<u32>().is_err() {
        out.push_str(name);
        out.push('=');
    }
    out.push_str(value);
}

/// `{{name|key=value|...}}` on one line.
pub fn render_template<K, V>(name: &str, fields: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = format!("{{{{{name}");
    for (k, v) in fields {
        push_param(&mut out, k.as_ref(), v.as_ref());
    }
    out.push_str("}}");
    out
}

/// `{{name` followed by one `|key=value` line per field, then `}}`.
pub fn render_template_multiline<K, V>(name: &str, fields: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = format!("{{{{{name}\n");
    for (k, v) in fields {
        push_param(&mut out, k.as_ref(), v.as_ref());
        out.push('\n');
    }
    out.push_str("}}");
    out
}
