use crate::util::doc::{width, DocLine, Segment, Tone};

pub type Cell = Vec<Segment>;

/// Column-aligned table, indented two spaces, columns separated by two
/// spaces, with a dashed rule under the header.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<&'static str>,
    rows:    Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Table { headers: headers.to_vec(), rows: Vec::new() }
    }

    pub fn row(&mut self, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.headers.len());
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> Vec<DocLine> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(width(cell));
            }
        }

        let mut out = Vec::with_capacity(self.rows.len() + 2);
        let header: Vec<Cell> = self.headers.iter()
            .map(|h| vec![Segment::new(*h, Tone::Plain)])
            .collect();
        out.push(layout(&header, &widths));
        let rule: Vec<Cell> = widths.iter()
            .map(|w| vec![Segment::plain("-".repeat(*w))])
            .collect();
        out.push(layout(&rule, &widths));
        for row in &self.rows {
            out.push(layout(row, &widths));
        }
        out
    }
}

fn layout(cells: &[Cell], widths: &[usize]) -> DocLine {
    let mut line = vec![Segment::plain("  ")];
    for (i, cell) in cells.iter().enumerate() {
        line.extend(cell.iter().cloned());
        if i + 1 < cells.len() {
            let pad = widths[i].saturating_sub(width(cell)) + 2;
            line.push(Segment::plain(" ".repeat(pad)));
        }
    }
    line
}

/// Single plain-text cell.
pub fn cell(s: impl Into<String>) -> Cell {
    vec![Segment::plain(s)]
}

/// Single styled cell.
pub fn styled(s: impl Into<String>, tone: Tone) -> Cell {
    vec![Segment::new(s, tone)]
}
