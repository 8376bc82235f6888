#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the fixtures"
)]

use core::error::Error;
use css_minifier::{
    InlineStyle, MinifierOptions, MinifyStats, StylesheetEntry, StylesheetSet, minify_stylesheets,
};
use css_syntax::parse_stylesheet;
use html::DOM;
use indextree::NodeId;

pub struct Page {
    pub dom: DOM,
    pub heading: NodeId,
}

/// `<html><body><h1 class="title">Title</h1><section class="row"><div class="box"></div>
/// <div class="box wide"></div></section></body></html>`
pub fn build_page() -> Result<Page, Box<dyn Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut dom = DOM::new();
    let html = dom.append_element(dom.root(), "html")?;
    let body = dom.append_element(html, "body")?;
    let heading = dom.append_element(body, "h1")?;
    dom.set_attribute(heading, "class", "title")?;
    dom.append_text(heading, "Title")?;
    let section = dom.append_element(body, "section")?;
    dom.set_attribute(section, "class", "row")?;
    let first = dom.append_element(section, "div")?;
    dom.set_attribute(first, "class", "box")?;
    let wide = dom.append_element(section, "div")?;
    dom.set_attribute(wide, "class", "box wide")?;
    Ok(Page {
        dom,
        heading,
    })
}

/// Minify one stylesheet and return its serialization.
pub fn minify_one(
    dom: &DOM,
    css: &str,
    inline_styles: &[InlineStyle<NodeId>],
    options: MinifierOptions,
) -> Result<(String, MinifyStats), Box<dyn Error>> {
    let mut sheets = StylesheetSet::new();
    sheets.push(0_usize, StylesheetEntry::new(parse_stylesheet(css)));
    let stats = minify_stylesheets(dom, &mut sheets, inline_styles, options)?;
    let output = sheets
        .get(&0)
        .map(|entry| entry.stylesheet.to_string())
        .ok_or("stylesheet vanished from the set")?;
    Ok((output, stats))
}
