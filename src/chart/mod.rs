//! Line chart boundary: the game only needs "draw these points" and
//! "append one more", exactly the surface Chart-style widgets expose.

const DEFAULT_HEIGHT: usize = 12;
const Y_AXIS_WIDTH: usize = 9;

const GLYPH_POINT: char = '●';
const GLYPH_RISER: char = '│';
const GLYPH_AXIS: char = '┤';
const GLYPH_CORNER: char = '└';
const GLYPH_BASELINE: char = '─';

/// What the game asks of a chart: full (re)initialization from a label/value
/// pair of sequences, and incremental append of one revealed point.
pub trait ChartRenderer {
    fn render(&mut self, labels: &[String], values: &[f64]);
    fn append_point(&mut self, label: &str, value: f64);
}

/// Fixed-height Unicode line chart written to stdout.
///
/// Prices are scaled to rows between the series min and max; each point gets
/// one column, with riser glyphs filling the vertical gap to the previous
/// point so the chart reads as a line.
pub struct TerminalChart {
    labels: Vec<String>,
    values: Vec<f64>,
    height: usize,
}

impl TerminalChart {
    pub fn new(height: usize) -> Self {
        Self {
            labels: Vec::new(),
            values: Vec::new(),
            height: height.max(3),
        }
    }

    /// Row index (0 = top) for a value within [min, max]
    fn row_for(&self, value: f64, min: f64, max: f64) -> usize {
        if (max - min).abs() < f64::EPSILON {
            return self.height / 2;
        }
        let t = (max - value) / (max - min);
        (t * (self.height - 1) as f64).round() as usize
    }

    /// Render the full chart as a string (stdout-free, so tests can assert)
    pub fn draw(&self) -> String {
        if self.values.is_empty() {
            return String::new();
        }

        let min = self.values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let rows: Vec<usize> = self
            .values
            .iter()
            .map(|v| self.row_for(*v, min, max))
            .collect();

        let mut grid = vec![vec![' '; self.values.len()]; self.height];
        for (col, &row) in rows.iter().enumerate() {
            grid[row][col] = GLYPH_POINT;
            if col > 0 {
                let prev = rows[col - 1];
                let (lo, hi) = if prev < row { (prev, row) } else { (row, prev) };
                for r in (lo + 1)..hi {
                    grid[r][col] = GLYPH_RISER;
                }
            }
        }

        let mut out = String::new();
        for (r, cells) in grid.iter().enumerate() {
            let price = if self.height > 1 {
                max - (r as f64 / (self.height - 1) as f64) * (max - min)
            } else {
                max
            };
            let line: String = cells.iter().collect();
            out.push_str(&format!(
                "{:>width$.2} {}{}\n",
                price,
                GLYPH_AXIS,
                line.trim_end(),
                width = Y_AXIS_WIDTH
            ));
        }

        // Baseline and date range
        out.push_str(&format!(
            "{} {}{}\n",
            " ".repeat(Y_AXIS_WIDTH),
            GLYPH_CORNER,
            GLYPH_BASELINE.to_string().repeat(self.values.len())
        ));
        if let (Some(first), Some(last)) = (self.labels.first(), self.labels.last()) {
            if self.labels.len() > 1 {
                let gap = self
                    .values
                    .len()
                    .saturating_sub(first.len())
                    .saturating_sub(2);
                out.push_str(&format!(
                    "{}  {}{}{}\n",
                    " ".repeat(Y_AXIS_WIDTH),
                    first,
                    " ".repeat(gap.max(1)),
                    last
                ));
            } else {
                out.push_str(&format!("{}  {}\n", " ".repeat(Y_AXIS_WIDTH), first));
            }
        }
        out
    }
}

impl Default for TerminalChart {
    fn default() -> Self {
        Self::new(DEFAULT_HEIGHT)
    }
}

impl ChartRenderer for TerminalChart {
    fn render(&mut self, labels: &[String], values: &[f64]) {
        self.labels = labels.to_vec();
        self.values = values.to_vec();
        println!("{}", self.draw());
    }

    fn append_point(&mut self, label: &str, value: f64) {
        self.labels.push(label.to_string());
        self.values.push(value);
        println!("{}", self.draw());
    }
}
