use serde::Serialize;
use crate::sim::{end_to_end_delay, PacketRecord, Scalar};

/// How records are printed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// Pipe table, one row per packet.
    #[default]
    Table,
    /// The whole run as a JSON document.
    Json,
}

/// Renders the records of one run.
pub struct Report<'a, T> {
    records: &'a [PacketRecord<T>],
    /// Fixed digits after the decimal point, or the natural representation.
    places: Option<usize>,
}

#[derive(Serialize)]
struct Document<'a, T> {
    precision: &'static str,
    end_to_end_delay: Option<&'a T>,
    packets: &'a [PacketRecord<T>],
}

#[derive(Copy, Clone, PartialEq)]
enum Align {
    Left,
    Right,
}

impl<'a, T: Scalar> Report<'a, T> {
    pub fn new(records: &'a [PacketRecord<T>]) -> Self {
        Self { records, places: None }
    }

    pub fn with_places(mut self, places: Option<usize>) -> Self {
        self.places = places;
        self
    }

    fn cell(&self, v: &T) -> String {
        match self.places {
            Some(p) => v.fixed(p),
            None => v.to_string(),
        }
    }

    /// Column titles for a chain of `l` links.
    /// A 2-link chain keeps the classic single router titles.
    fn headers(l: usize) -> Vec<String> {
        let mut headers = vec!["Packet".to_string(), "A (ms)".to_string()];
        if l == 2 {
            headers.push("R (ms)".to_string());
        }
        else {
            for i in 1..l {
                headers.push(format!("R{} (ms)", i));
            }
        }
        headers.push("B (ms)".to_string());
        if l == 2 {
            headers.push("Queue Delay (ms)".to_string());
        }
        else {
            for i in 1..l {
                headers.push(format!("Q{} (ms)", i));
            }
        }
        headers
    }

    fn row(&self, record: &PacketRecord<T>) -> Vec<String> {
        let mut row = vec![format!("P{}", record.index), self.cell(&record.injection_time)];
        row.extend(record.arrival_times.iter().map(|v| self.cell(v)));
        row.extend(record.queue_delays.iter().map(|v| self.cell(v)));
        row
    }

    /// Pipe table: packet labels left aligned, times right aligned.
    pub fn table(&self) -> String {
        let l = self.records.first().map_or(0, |r| r.arrival_times.len());
        let headers = Self::headers(l);
        let rows: Vec<Vec<String>> = self.records.iter().map(|r| self.row(r)).collect();

        let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }
        let align = |i: usize| if i == 0 { Align::Left } else { Align::Right };

        let mut out = String::new();
        let line = |out: &mut String, cells: &[String]| {
            out.push('|');
            for (i, (cell, w)) in cells.iter().zip(&widths).enumerate() {
                let padded = match align(i) {
                    Align::Left => format!(" {:<w$} |", cell, w = w),
                    Align::Right => format!(" {:>w$} |", cell, w = w),
                };
                out.push_str(&padded);
            }
            out.push('\n');
        };

        line(&mut out, &headers);
        out.push('|');
        for (i, w) in widths.iter().enumerate() {
            let dashes = "-".repeat(*w);
            let rule = match align(i) {
                Align::Left => format!(":{}-|", dashes),
                Align::Right => format!("-{}:|", dashes),
            };
            out.push_str(&rule);
        }
        out.push('\n');
        for row in &rows {
            line(&mut out, row);
        }
        out
    }

    /// Final line with the end-to-end delay of the last packet.
    pub fn summary(&self) -> Option<String> {
        end_to_end_delay(self.records).map(|b| format!("End-to-end delay: {} ms", self.cell(b)))
    }

    pub fn json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Document {
            precision: T::NAME,
            end_to_end_delay: end_to_end_delay(self.records),
            packets: self.records,
        })
    }
}
