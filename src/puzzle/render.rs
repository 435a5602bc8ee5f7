use std::sync::{Arc, OnceLock};

use crate::{models::Puzzle, puzzle::error::RenderError};

/// File name offered when a puzzle is downloaded
pub const EXPORT_FILENAME: &str = "word-search-puzzle.png";

const PADDING: usize = 40;
const WORDS_PER_ROW: usize = 3;
const WORD_COLUMN_WIDTH: usize = 150;
const WORD_ROW_HEIGHT: usize = 25;
const WORD_LIST_OFFSET: usize = 40;
const WORD_LIST_AREA: usize = 60;

/// Cell edge in pixels; huge grids get smaller cells
fn cell_size(side: usize) -> usize {
    if side > 20 {
        20
    } else {
        30
    }
}

/// System fonts, loaded once on first export
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut fontdb = usvg::fontdb::Database::new();
            fontdb.load_system_fonts();
            tracing::debug!("Loaded {} font faces for export", fontdb.len());
            Arc::new(fontdb)
        })
        .clone()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain-text rendering: the grid, a blank line, then the word list
pub fn render_text(puzzle: &Puzzle) -> String {
    let mut out = String::new();

    for row in &puzzle.grid {
        let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }

    if !puzzle.words.is_empty() {
        out.push('\n');
        let width = puzzle.words.iter().map(|w| w.len()).max().unwrap_or(0) + 2;
        for chunk in puzzle.words.chunks(WORDS_PER_ROW) {
            let line: String = chunk
                .iter()
                .map(|w| format!("{:<width$}", w, width = width))
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    out
}

/// Printable SVG: the grid with gridlines and the word list underneath
pub fn render_svg(puzzle: &Puzzle) -> String {
    let side = puzzle.side();
    let cell = cell_size(side);
    let puzzle_extent = side * cell;
    let word_list_width = puzzle.words.len().div_ceil(WORDS_PER_ROW) * WORD_COLUMN_WIDTH;

    let width = (puzzle_extent + PADDING * 2).max(word_list_width + PADDING * 2);
    let height = puzzle_extent + PADDING * 2 + WORD_LIST_AREA;
    let grid_x = (width - puzzle_extent) as f64 / 2.0;
    let half = cell as f64 / 2.0;
    let font_size = (cell as f64 * 0.6).floor() as usize;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    svg.push('\n');
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
        width, height
    ));
    svg.push('\n');

    svg.push_str(r##"<g stroke="#ccc" stroke-width="1">"##);
    svg.push('\n');
    for i in 0..=side {
        let offset = (i * cell) as f64;
        svg.push_str(&format!(
            r#"<line x1="{x}" y1="{top}" x2="{x}" y2="{bottom}"/>"#,
            x = grid_x + offset,
            top = PADDING,
            bottom = PADDING + puzzle_extent
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<line x1="{left}" y1="{y}" x2="{right}" y2="{y}"/>"#,
            left = grid_x,
            right = grid_x + puzzle_extent as f64,
            y = PADDING + i * cell
        ));
        svg.push('\n');
    }
    svg.push_str("</g>\n");

    svg.push_str(&format!(
        r#"<g font-family="monospace" font-size="{}" font-weight="bold" text-anchor="middle" dominant-baseline="middle" fill="black">"#,
        font_size
    ));
    svg.push('\n');
    for (i, row) in puzzle.grid.iter().enumerate() {
        for (j, letter) in row.iter().enumerate() {
            svg.push_str(&format!(
                r#"<text x="{}" y="{}">{}</text>"#,
                grid_x + (j * cell) as f64 + half,
                (PADDING + i * cell) as f64 + half,
                escape_xml(&letter.to_string())
            ));
            svg.push('\n');
        }
    }
    svg.push_str("</g>\n");

    let spacing = (WORD_COLUMN_WIDTH as f64).min(width as f64 / 3.0 - 20.0);
    svg.push_str(r#"<g font-family="sans-serif" font-size="16" fill="black">"#);
    svg.push('\n');
    for (index, word) in puzzle.words.iter().enumerate() {
        let row = index / WORDS_PER_ROW;
        let col = index % WORDS_PER_ROW;
        svg.push_str(&format!(
            r#"<text x="{}" y="{}">{}</text>"#,
            PADDING as f64 + col as f64 * spacing,
            PADDING + puzzle_extent + WORD_LIST_OFFSET + row * WORD_ROW_HEIGHT,
            escape_xml(word)
        ));
        svg.push('\n');
    }
    svg.push_str("</g>\n</svg>\n");

    svg
}

/// Rasterize the SVG drawing at 1:1 and encode it as PNG
pub fn render_png(puzzle: &Puzzle) -> Result<Vec<u8>, RenderError> {
    let svg = render_svg(puzzle);

    let options = usvg::Options {
        fontdb: font_database(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &options)?;

    let size = tree.size().to_int_size();
    let mut pixmap =
        tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(RenderError::Pixmap {
            width: size.width(),
            height: size.height(),
        })?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))
}
