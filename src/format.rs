//! The emitter: walks a `Vec<Stmt>` CSS tree and renders it as text (spec
//! §4.5.1 "output-tree invariants", §6.3 `output-style`/`indent`/
//! `linefeed`). Kept light relative to the evaluator/selector/extend core
//! (spec §1); one pass, no intermediate buffer beyond the `String` itself.

use crate::options::{OutputStyle, Options};
use crate::selector::SelectorList;
use crate::stmt::Stmt;

pub(crate) fn emit(stmts: &[Stmt], options: &Options) -> String {
    let mut out = String::new();
    let mut printer = Printer {
        style: options.output_style,
        indent: &options.indent,
        linefeed: &options.linefeed,
    };
    printer.emit_stmts(stmts, 0, &mut out);
    if matches!(printer.style, OutputStyle::Compressed) {
        return out;
    }
    while out.ends_with(printer.linefeed.as_str()) {
        out.truncate(out.len() - printer.linefeed.len());
    }
    if !out.is_empty() {
        out.push_str(printer.linefeed);
    }
    out
}

struct Printer<'a> {
    style: OutputStyle,
    indent: &'a str,
    linefeed: &'a str,
}

impl Printer<'_> {
    fn pad(&self, depth: usize) -> String {
        if matches!(self.style, OutputStyle::Compressed) {
            String::new()
        } else {
            self.indent.repeat(depth)
        }
    }

    fn emit_stmts(&mut self, stmts: &[Stmt], depth: usize, out: &mut String) {
        for stmt in stmts {
            self.emit_stmt(stmt, depth, out);
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt, depth: usize, out: &mut String) {
        match stmt {
            Stmt::RuleSet { selector, body } => self.emit_ruleset(selector, body, depth, out),
            Stmt::Style(style) => self.emit_style(style, depth, out),
            Stmt::Comment(text) => self.emit_comment(text, depth, out),
            Stmt::Media { query, body } => self.emit_at_block("media", query, body, depth, out),
            Stmt::Supports { query, body } => self.emit_at_block("supports", query, body, depth, out),
            Stmt::UnknownAtRule { name, params, body } => {
                self.emit_unknown(name, params, body, depth, out)
            }
        }
    }

    fn emit_ruleset(&mut self, selector: &SelectorList, body: &[Stmt], depth: usize, out: &mut String) {
        let visible = selector.without_placeholders();
        if visible.components.is_empty() {
            return;
        }

        let (direct_styles, nested): (Vec<&Stmt>, Vec<&Stmt>) = body
            .iter()
            .partition(|s| matches!(s, Stmt::Style(st) if !st.value.is_null()) || matches!(s, Stmt::Comment(..)));

        if !direct_styles.is_empty() {
            self.open_rule(&visible, depth, out);
            for s in &direct_styles {
                self.emit_stmt(s, depth + 1, out);
            }
            self.close_rule(depth, out);
        }

        for s in &nested {
            match s {
                Stmt::RuleSet { selector: inner, body: inner_body } => {
                    self.emit_ruleset(inner, inner_body, depth, out)
                }
                other => self.emit_stmt(other, depth, out),
            }
        }
    }

    fn open_rule(&self, selector: &SelectorList, depth: usize, out: &mut String) {
        out.push_str(&self.pad(depth));
        out.push_str(&selector.to_string());
        match self.style {
            OutputStyle::Compressed => out.push('{'),
            OutputStyle::Compact => out.push_str(" { "),
            _ => {
                out.push_str(" {");
                out.push_str(self.linefeed);
            }
        }
    }

    fn close_rule(&self, depth: usize, out: &mut String) {
        match self.style {
            OutputStyle::Compressed => out.push('}'),
            OutputStyle::Compact => out.push_str("}"),
            _ => {
                out.push_str(&self.pad(depth));
                out.push('}');
            }
        }
        out.push_str(self.linefeed);
    }

    fn emit_style(&self, style: &crate::value::style::Style, depth: usize, out: &mut String) {
        let Ok(Some(css)) = style.to_css_string(codemap::Span::dummy()) else {
            return;
        };
        match self.style {
            OutputStyle::Compressed => out.push_str(css.trim_end_matches(';')),
            OutputStyle::Compact => out.push_str(&css),
            _ => {
                out.push_str(&self.pad(depth));
                out.push_str(&css);
                out.push_str(self.linefeed);
            }
        }
        if matches!(self.style, OutputStyle::Compressed) {
            out.push(';');
        }
    }

    fn emit_comment(&self, text: &str, depth: usize, out: &mut String) {
        if matches!(self.style, OutputStyle::Compressed) {
            return;
        }
        out.push_str(&self.pad(depth));
        out.push_str(text);
        out.push_str(self.linefeed);
    }

    fn emit_at_block(&mut self, keyword: &str, query: &str, body: &[Stmt], depth: usize, out: &mut String) {
        out.push_str(&self.pad(depth));
        out.push_str(&format!("@{keyword} {query}"));
        out.push_str(" {");
        out.push_str(self.linefeed);
        self.emit_stmts(body, depth + 1, out);
        out.push_str(&self.pad(depth));
        out.push('}');
        out.push_str(self.linefeed);
    }

    fn emit_unknown(&mut self, name: &str, params: &str, body: &[Stmt], depth: usize, out: &mut String) {
        out.push_str(&self.pad(depth));
        if params.is_empty() {
            out.push_str(&format!("@{name}"));
        } else {
            out.push_str(&format!("@{name} {params}"));
        }
        if body.is_empty() {
            out.push(';');
            out.push_str(self.linefeed);
            return;
        }
        out.push_str(" {");
        out.push_str(self.linefeed);
        self.emit_stmts(body, depth + 1, out);
        out.push_str(&self.pad(depth));
        out.push('}');
        out.push_str(self.linefeed);
    }
}
