//! Query analysis
//!
//! A user question is routed by keyword heuristics to one of seven analysis
//! kinds. In AI mode the kind picks a prompt template that gets sent to the
//! hosted chat API together with the data context; in local mode the kind
//! picks a rule-based report built from simple aggregations over the frame.

pub mod local;
pub mod prompts;

use crate::frame::Frame;
use crate::llm::ChatClient;
use crate::types::{AppResult, ChatRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Summary,
    Top,
    Compare,
    Trend,
    Profit,
    Region,
    Custom,
}

impl QueryKind {
    /// First-match-wins keyword routing, case-insensitive substring
    /// containment. The order is fixed: summary, top, compare, trend,
    /// profit, region; anything else is a custom query.
    pub fn detect(query: &str) -> Self {
        let q = query.to_lowercase();
        let contains_any = |words: &[&str]| words.iter().any(|w| q.contains(w));

        if contains_any(&["summary", "overview", "describe", "what is this", "about"]) {
            QueryKind::Summary
        } else if contains_any(&[
            "top", "best", "highest", "most", "largest", "greatest", "leading",
        ]) {
            QueryKind::Top
        } else if contains_any(&["compare", "versus", "vs", "difference", "between"]) {
            QueryKind::Compare
        } else if contains_any(&[
            "trend", "time", "over time", "growth", "change", "monthly", "yearly", "pattern",
        ]) {
            QueryKind::Trend
        } else if contains_any(&[
            "profit", "margin", "earnings", "revenue", "income", "cost",
        ]) {
            QueryKind::Profit
        } else if contains_any(&[
            "region", "location", "geography", "state", "city", "country", "area",
        ]) {
            QueryKind::Region
        } else {
            QueryKind::Custom
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::Summary => "summary",
            QueryKind::Top => "top",
            QueryKind::Compare => "compare",
            QueryKind::Trend => "trend",
            QueryKind::Profit => "profit",
            QueryKind::Region => "region",
            QueryKind::Custom => "custom",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            QueryKind::Summary => "Data Summary",
            QueryKind::Top => "Top Performers Analysis",
            QueryKind::Compare => "Comparison Analysis",
            QueryKind::Trend => "Trend Analysis",
            QueryKind::Profit => "Profit Analysis",
            QueryKind::Region => "Regional Analysis",
            QueryKind::Custom => "Analysis Result",
        }
    }
}

/// AI mode: build the kind-specific prompt over the data context and relay
/// whatever text the hosted model returns. The caller assembles the context
/// so it can append notes about files that failed to parse.
pub async fn run_ai_analysis(
    client: &ChatClient,
    model: &str,
    max_tokens: u32,
    kind: QueryKind,
    query: &str,
    context: &str,
) -> AppResult<String> {
    let (system, user) = prompts::build_prompt(kind, query, context);
    let request =
        ChatRequest::prompt(model, Some(&system), &user).with_max_tokens(max_tokens);
    let reply = client.chat(&request).await?;
    Ok(reply.content)
}

/// Local mode: rule-based report, no outbound call.
pub fn run_local_report(kind: QueryKind, frame: &Frame) -> String {
    local::build_report(kind, frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_kind() {
        assert_eq!(QueryKind::detect("give me a summary"), QueryKind::Summary);
        assert_eq!(QueryKind::detect("top brands by sales"), QueryKind::Top);
        assert_eq!(QueryKind::detect("compare regions"), QueryKind::Compare);
        assert_eq!(
            QueryKind::detect("sales trends over time"),
            QueryKind::Trend
        );
        assert_eq!(QueryKind::detect("profit analysis"), QueryKind::Profit);
        assert_eq!(
            QueryKind::detect("breakdown by country"),
            QueryKind::Region
        );
        assert_eq!(
            QueryKind::detect("which rows have missing values"),
            QueryKind::Custom
        );
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(QueryKind::detect("SUMMARY please"), QueryKind::Summary);
        assert_eq!(QueryKind::detect("Top Sellers"), QueryKind::Top);
    }

    #[test]
    fn test_detect_order_is_fixed() {
        // "top" appears before "region" in the routing order, so a query
        // containing both routes to Top.
        assert_eq!(QueryKind::detect("top regions"), QueryKind::Top);
        // "summary" wins over everything after it.
        assert_eq!(
            QueryKind::detect("summary of profit by region"),
            QueryKind::Summary
        );
    }
}
