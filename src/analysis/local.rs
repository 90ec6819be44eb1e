//! Local analysis mode
//!
//! Rule-based text reports built from branch-local aggregations over the
//! frame: group-by of a categorical column with sums and means of numeric
//! columns, top-N ranking, month bucketing for trends, and keyword matching
//! to find profit- or location-flavored columns. No outbound calls.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::QueryKind;
use crate::frame::Frame;

const TOP_N: usize = 10;
const MAX_GROUPS: usize = 15;

const PROFIT_WORDS: [&str; 7] = [
    "profit", "margin", "revenue", "income", "cost", "earnings", "sales",
];
const REGION_WORDS: [&str; 6] = ["region", "location", "state", "city", "country", "area"];

pub fn build_report(kind: QueryKind, frame: &Frame) -> String {
    let report = match kind {
        QueryKind::Summary | QueryKind::Custom => Some(summary_report(frame)),
        QueryKind::Top => top_report(frame),
        QueryKind::Compare => compare_report(frame),
        QueryKind::Trend => trend_report(frame),
        QueryKind::Profit => profit_report(frame),
        QueryKind::Region => region_report(frame),
    };
    // Every branch degrades to the summary when it finds nothing to chew on.
    report.unwrap_or_else(|| summary_report(frame))
}

fn summary_report(frame: &Frame) -> String {
    let mut out = format!(
        "Dataset overview: {} rows, {} columns.\n\n",
        frame.row_count(),
        frame.column_count()
    );
    out.push_str("Columns:\n");
    for (col, dtype) in frame.columns.iter().zip(frame.dtypes.iter()) {
        out.push_str(&format!("- {} ({})\n", col, dtype));
    }

    let stats = frame.describe();
    if !stats.is_empty() {
        out.push_str("\nNumeric column statistics:\n");
        for s in &stats {
            out.push_str(&format!(
                "- {}: count={}, mean={:.2}, std={:.2}, min={:.2}, median={:.2}, max={:.2}\n",
                s.column, s.count, s.mean, s.std_dev, s.min, s.median, s.max
            ));
        }
    }
    out
}

/// Top-N groups of the first categorical column, ranked by the sum of the
/// first numeric column.
fn top_report(frame: &Frame) -> Option<String> {
    let group_idx = *frame.text_columns().first()?;
    let value_idx = *frame.numeric_columns().first()?;

    let sums = group_sums(frame, group_idx, value_idx);
    if sums.is_empty() {
        return None;
    }
    let total: f64 = sums.iter().map(|(_, v, _)| v).sum();

    let mut out = format!(
        "Top {} by total {}:\n\n",
        frame.columns[group_idx], frame.columns[value_idx]
    );
    for (rank, (label, sum, count)) in sums.iter().take(TOP_N).enumerate() {
        let share = if total != 0.0 { sum / total * 100.0 } else { 0.0 };
        out.push_str(&format!(
            "{}. {}: {:.2} ({:.1}% of total, {} rows)\n",
            rank + 1,
            label,
            sum,
            share,
            count
        ));
    }
    out.push_str(&format!("\nTotal {}: {:.2}\n", frame.columns[value_idx], total));
    Some(out)
}

/// Mean of every numeric column per group of the first categorical column.
fn compare_report(frame: &Frame) -> Option<String> {
    let group_idx = *frame.text_columns().first()?;
    let numeric = frame.numeric_columns();
    if numeric.is_empty() {
        return None;
    }

    // label -> per-numeric-column (sum, count)
    let mut groups: HashMap<String, Vec<(f64, usize)>> = HashMap::new();
    for row in &frame.rows {
        let label = match row.get(group_idx) {
            Some(l) if !l.trim().is_empty() => l.trim().to_string(),
            _ => continue,
        };
        let entry = groups
            .entry(label)
            .or_insert_with(|| vec![(0.0, 0); numeric.len()]);
        for (pos, col_idx) in numeric.iter().enumerate() {
            if let Some(val) = row.get(*col_idx).and_then(|v| v.trim().parse::<f64>().ok()) {
                entry[pos].0 += val;
                entry[pos].1 += 1;
            }
        }
    }
    if groups.is_empty() {
        return None;
    }

    let mut labels: Vec<String> = groups.keys().cloned().collect();
    labels.sort();
    labels.truncate(MAX_GROUPS);

    let mut out = format!("Comparison by {} (mean values):\n\n", frame.columns[group_idx]);
    for label in &labels {
        let sums = &groups[label];
        out.push_str(&format!("{}:\n", label));
        for (pos, col_idx) in numeric.iter().enumerate() {
            let (sum, count) = sums[pos];
            if count > 0 {
                out.push_str(&format!(
                    "  {}: mean={:.2} (n={})\n",
                    frame.columns[*col_idx],
                    sum / count as f64,
                    count
                ));
            }
        }
    }
    Some(out)
}

/// Monthly sums of every numeric column, bucketed on the first column whose
/// values parse as dates.
fn trend_report(frame: &Frame) -> Option<String> {
    let date_idx = find_date_column(frame)?;
    let numeric = frame.numeric_columns();
    if numeric.is_empty() {
        return None;
    }

    // "YYYY-MM" -> per-numeric-column sum
    let mut buckets: HashMap<String, Vec<f64>> = HashMap::new();
    for row in &frame.rows {
        let month = match row.get(date_idx).and_then(|v| parse_date(v)) {
            Some(date) => date.format("%Y-%m").to_string(),
            None => continue,
        };
        let entry = buckets.entry(month).or_insert_with(|| vec![0.0; numeric.len()]);
        for (pos, col_idx) in numeric.iter().enumerate() {
            if let Some(val) = row.get(*col_idx).and_then(|v| v.trim().parse::<f64>().ok()) {
                entry[pos] += val;
            }
        }
    }
    if buckets.is_empty() {
        return None;
    }

    let mut months: Vec<String> = buckets.keys().cloned().collect();
    months.sort();

    let mut out = format!(
        "Monthly totals by {} ({} to {}):\n\n",
        frame.columns[date_idx],
        months.first().map(String::as_str).unwrap_or(""),
        months.last().map(String::as_str).unwrap_or(""),
    );
    for month in &months {
        let sums = &buckets[month];
        let parts: Vec<String> = numeric
            .iter()
            .enumerate()
            .map(|(pos, col_idx)| format!("{}={:.2}", frame.columns[*col_idx], sums[pos]))
            .collect();
        out.push_str(&format!("{}: {}\n", month, parts.join(", ")));
    }
    Some(out)
}

/// Totals and means of profit-flavored numeric columns; margin when both a
/// profit and a revenue/sales column are present.
fn profit_report(frame: &Frame) -> Option<String> {
    let money_cols: Vec<usize> = frame
        .numeric_columns()
        .into_iter()
        .filter(|idx| {
            let name = frame.columns[*idx].to_lowercase();
            PROFIT_WORDS.iter().any(|w| name.contains(w))
        })
        .collect();
    if money_cols.is_empty() {
        return None;
    }

    let mut out = String::from("Profitability report:\n\n");
    let mut totals: HashMap<usize, f64> = HashMap::new();
    for idx in &money_cols {
        let values = frame.numeric_values(*idx);
        if values.is_empty() {
            continue;
        }
        let sum: f64 = values.iter().sum();
        totals.insert(*idx, sum);
        out.push_str(&format!(
            "- {}: total={:.2}, mean={:.2} (n={})\n",
            frame.columns[*idx],
            sum,
            sum / values.len() as f64,
            values.len()
        ));
    }

    let profit_idx = money_cols
        .iter()
        .copied()
        .find(|idx| frame.columns[*idx].to_lowercase().contains("profit"));
    let revenue_idx = money_cols.iter().copied().find(|idx| {
        let name = frame.columns[*idx].to_lowercase();
        name.contains("revenue") || name.contains("sales") || name.contains("income")
    });
    if let (Some(p), Some(r)) = (profit_idx, revenue_idx) {
        if let (Some(profit), Some(revenue)) = (totals.get(&p), totals.get(&r)) {
            if *revenue != 0.0 {
                out.push_str(&format!(
                    "\nOverall margin ({} / {}): {:.1}%\n",
                    frame.columns[p],
                    frame.columns[r],
                    profit / revenue * 100.0
                ));
            }
        }
    }
    Some(out)
}

/// Group sums of the first numeric column, grouped by the first column whose
/// name looks location-flavored.
fn region_report(frame: &Frame) -> Option<String> {
    let region_idx = frame.text_columns().into_iter().find(|idx| {
        let name = frame.columns[*idx].to_lowercase();
        REGION_WORDS.iter().any(|w| name.contains(w))
    })?;
    let value_idx = *frame.numeric_columns().first()?;

    let sums = group_sums(frame, region_idx, value_idx);
    if sums.is_empty() {
        return None;
    }

    let mut out = format!(
        "Breakdown of {} by {}:\n\n",
        frame.columns[value_idx], frame.columns[region_idx]
    );
    for (label, sum, count) in sums.iter().take(MAX_GROUPS) {
        out.push_str(&format!(
            "- {}: total={:.2}, mean={:.2} (n={})\n",
            label,
            sum,
            sum / *count as f64,
            count
        ));
    }
    Some(out)
}

/// (label, sum, count) per group of `group_idx`, summing `value_idx`,
/// sorted by sum descending.
fn group_sums(frame: &Frame, group_idx: usize, value_idx: usize) -> Vec<(String, f64, usize)> {
    let mut acc: HashMap<String, (f64, usize)> = HashMap::new();
    for row in &frame.rows {
        let label = match row.get(group_idx) {
            Some(l) if !l.trim().is_empty() => l.trim().to_string(),
            _ => continue,
        };
        if let Some(val) = row.get(value_idx).and_then(|v| v.trim().parse::<f64>().ok()) {
            let entry = acc.entry(label).or_insert((0.0, 0));
            entry.0 += val;
            entry.1 += 1;
        }
    }
    let mut sums: Vec<(String, f64, usize)> = acc
        .into_iter()
        .map(|(label, (sum, count))| (label, sum, count))
        .collect();
    sums.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    sums
}

fn find_date_column(frame: &Frame) -> Option<usize> {
    frame.text_columns().into_iter().find(|idx| {
        let mut seen = 0usize;
        let mut parsed = 0usize;
        for row in frame.rows.iter().take(20) {
            if let Some(val) = row.get(*idx) {
                if val.trim().is_empty() {
                    continue;
                }
                seen += 1;
                if parse_date(val).is_some() {
                    parsed += 1;
                }
            }
        }
        seen > 0 && parsed == seen
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let v = value.trim();
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(v, fmt) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    fn sales_frame() -> Frame {
        Frame::from_csv_reader(
            "brand,region,date,sales,profit\n\
             Acme,West,2024-01-10,100,20\n\
             Acme,East,2024-01-20,150,35\n\
             Zen,West,2024-02-05,80,10\n\
             Zen,East,2024-02-25,120,25\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_summary_report() {
        let report = build_report(QueryKind::Summary, &sales_frame());
        assert!(report.contains("4 rows, 5 columns"));
        assert!(report.contains("- brand (text)"));
        assert!(report.contains("- sales (numeric)"));
    }

    #[test]
    fn test_top_report_ranks_by_sum() {
        let report = build_report(QueryKind::Top, &sales_frame());
        // Acme sales 250 beats Zen sales 200.
        assert!(report.contains("1. Acme: 250.00"));
        assert!(report.contains("2. Zen: 200.00"));
        assert!(report.contains("Total sales: 450.00"));
    }

    #[test]
    fn test_compare_report_means() {
        let report = build_report(QueryKind::Compare, &sales_frame());
        assert!(report.contains("Comparison by brand"));
        assert!(report.contains("Acme:"));
        assert!(report.contains("sales: mean=125.00 (n=2)"));
    }

    #[test]
    fn test_trend_report_buckets_months() {
        let report = build_report(QueryKind::Trend, &sales_frame());
        assert!(report.contains("2024-01"));
        assert!(report.contains("2024-02"));
        assert!(report.contains("sales=250.00"));
        assert!(report.contains("sales=200.00"));
    }

    #[test]
    fn test_profit_report_margin() {
        let report = build_report(QueryKind::Profit, &sales_frame());
        assert!(report.contains("profit: total=90.00"));
        assert!(report.contains("sales: total=450.00"));
        // 90 / 450 = 20%
        assert!(report.contains("20.0%"));
    }

    #[test]
    fn test_region_report_groups_by_region_column() {
        let report = build_report(QueryKind::Region, &sales_frame());
        assert!(report.contains("by region"));
        assert!(report.contains("West: total=180.00"));
        assert!(report.contains("East: total=270.00"));
    }

    #[test]
    fn test_fallback_to_summary_without_suitable_columns() {
        let frame = Frame::from_csv_reader("a,b\n1,2\n3,4\n".as_bytes()).unwrap();
        // No text column to group on: top falls back to the summary.
        let report = build_report(QueryKind::Top, &frame);
        assert!(report.contains("Dataset overview"));
        // No date column either.
        let report = build_report(QueryKind::Trend, &frame);
        assert!(report.contains("Dataset overview"));
    }
}
