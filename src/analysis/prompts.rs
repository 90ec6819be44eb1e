//! Prompt templates for AI-mode analysis, one per query kind.

use super::QueryKind;

/// How many sample rows the data context carries into the prompt.
pub const CONTEXT_SAMPLE_ROWS: usize = 50;

const ANALYST_SYSTEM: &str = "You are a data analyst expert. Provide clear, actionable \
insights from data. Use markdown formatting.";

const TOP_SYSTEM: &str = "You are a data analyst expert. When asked about 'top' or 'best', \
analyze the data to find and rank the highest performers. Always use actual numbers from the data.";

const COMPARE_SYSTEM: &str = "You are a data analyst expert specializing in comparative \
analysis. Create clear side-by-side comparisons using data tables and highlight key differences.";

const TREND_SYSTEM: &str = "You are a data analyst expert in time series and trend analysis. \
Identify patterns, calculate growth rates, and provide actionable trend insights.";

const PROFIT_SYSTEM: &str = "You are a financial analyst expert. Provide detailed \
profitability analysis with actual calculations, margins, and actionable recommendations.";

const REGION_SYSTEM: &str = "You are a market analyst expert in geographic analysis. Provide \
regional breakdowns with actual data, identify geographic patterns, and highlight regional \
opportunities.";

const CUSTOM_SYSTEM: &str = "You are a data analyst expert. Answer questions about data \
accurately using the actual numbers from the dataset. Provide clear, actionable insights.";

/// Returns (system message, user prompt) for the given kind.
pub fn build_prompt(kind: QueryKind, query: &str, context: &str) -> (String, String) {
    let system = match kind {
        QueryKind::Summary => ANALYST_SYSTEM,
        QueryKind::Top => TOP_SYSTEM,
        QueryKind::Compare => COMPARE_SYSTEM,
        QueryKind::Trend => TREND_SYSTEM,
        QueryKind::Profit => PROFIT_SYSTEM,
        QueryKind::Region => REGION_SYSTEM,
        QueryKind::Custom => CUSTOM_SYSTEM,
    }
    .to_string();

    let user = match kind {
        QueryKind::Summary => format!(
            "Analyze this dataset and provide a comprehensive summary:\n\n{context}\n\n\
Please provide:\n\
1. **Overview**: What this data represents\n\
2. **Key Statistics**: Important numbers and metrics\n\
3. **Data Quality**: Any missing values, anomalies, or issues\n\
4. **Column Analysis**: Brief description of each column's purpose\n\
5. **Initial Insights**: 3-5 interesting observations from the data\n\n\
Format your response in clear markdown with headers and bullet points."
        ),
        QueryKind::Top => format!(
            "Based on this dataset, answer the user's query about top performers:\n\n\
USER QUERY: {query}\n\nDATASET:\n{context}\n\n\
Please provide:\n\
1. **Top Performers**: List the top items/categories based on the query\n\
2. **Rankings**: Show rankings with actual values and percentages\n\
3. **Comparison**: How the top performers compare to the average\n\
4. **Analysis**: Why these might be the top performers\n\
5. **Visualization Suggestion**: What chart would best show this data\n\n\
Use actual numbers from the data. Format with markdown tables where appropriate."
        ),
        QueryKind::Compare => format!(
            "Based on this dataset, perform a comparison analysis:\n\n\
USER QUERY: {query}\n\nDATASET:\n{context}\n\n\
Please provide:\n\
1. **Comparison Overview**: What categories/dimensions are being compared\n\
2. **Side-by-Side Metrics**: Key metrics for each category (use markdown table)\n\
3. **Differences**: Significant differences between categories\n\
4. **Similarities**: What the categories have in common\n\
5. **Winner Analysis**: Which category performs best and why\n\
6. **Recommendations**: Based on the comparison, what actions to consider\n\n\
Use actual numbers from the data. Present comparisons in clear tables."
        ),
        QueryKind::Trend => format!(
            "Based on this dataset, analyze trends and time-based patterns:\n\n\
USER QUERY: {query}\n\nDATASET:\n{context}\n\n\
Please provide:\n\
1. **Time Period Covered**: What date range does the data span\n\
2. **Overall Trend**: Is the data trending up, down, or stable\n\
3. **Seasonal Patterns**: Any monthly, weekly, or seasonal patterns\n\
4. **Growth Analysis**: Calculate growth rates where possible\n\
5. **Peak Periods**: When are the highs and lows\n\
6. **Trend Breakdown**: By category if applicable\n\
7. **Forecast Insight**: Based on trends, what might we expect next\n\n\
Use actual numbers and calculate percentages where relevant. Show month-over-month or \
period comparisons."
        ),
        QueryKind::Profit => format!(
            "Based on this dataset, perform a profitability analysis:\n\n\
USER QUERY: {query}\n\nDATASET:\n{context}\n\n\
Please provide:\n\
1. **Profit Overview**: Total profit, average profit, profit range\n\
2. **Margin Analysis**: Profit margins by category (if available)\n\
3. **Most Profitable**: Top profitable items/categories/segments\n\
4. **Least Profitable**: Items with lowest profitability\n\
5. **Profit Drivers**: What factors correlate with higher profits\n\
6. **Profit Trends**: How profit changes over time (if date data exists)\n\
7. **Recommendations**: How to improve profitability\n\n\
Use actual numbers. Calculate totals, averages, and percentages. Present in tables where \
helpful."
        ),
        QueryKind::Region => format!(
            "Based on this dataset, perform a geographic/regional analysis:\n\n\
USER QUERY: {query}\n\nDATASET:\n{context}\n\n\
Please provide:\n\
1. **Geographic Coverage**: What regions/locations are in the data\n\
2. **Regional Performance**: Metrics by region (table format)\n\
3. **Top Regions**: Best performing geographic areas\n\
4. **Regional Comparison**: How regions differ from each other\n\
5. **Market Penetration**: Distribution across regions\n\
6. **Regional Trends**: Any regional patterns or anomalies\n\
7. **Opportunities**: Underperforming regions with potential\n\n\
Use actual numbers. Show region-by-region breakdown in tables."
        ),
        QueryKind::Custom => format!(
            "Based on this dataset, answer the user's question:\n\n\
USER QUERY: {query}\n\nDATASET:\n{context}\n\n\
Please provide a comprehensive answer to the user's question. Include:\n\
- Direct answer to the question\n\
- Supporting data and numbers from the dataset\n\
- Any relevant calculations\n\
- Additional insights that might be helpful\n\
- Recommendations if applicable\n\n\
Format your response clearly with markdown. Use tables for data comparisons."
        ),
    };

    (system, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_query_and_context() {
        for kind in [
            QueryKind::Top,
            QueryKind::Compare,
            QueryKind::Trend,
            QueryKind::Profit,
            QueryKind::Region,
            QueryKind::Custom,
        ] {
            let (system, user) = build_prompt(kind, "my question", "THE CONTEXT");
            assert!(!system.is_empty());
            assert!(user.contains("my question"), "kind {:?}", kind);
            assert!(user.contains("THE CONTEXT"), "kind {:?}", kind);
        }
    }

    #[test]
    fn test_summary_prompt_ignores_query() {
        // Summary reports do not depend on how the question was phrased;
        // the template only carries the context.
        let (_, user) = build_prompt(QueryKind::Summary, "ignored", "THE CONTEXT");
        assert!(user.contains("THE CONTEXT"));
        assert!(!user.contains("ignored"));
    }

    #[test]
    fn test_templates_keep_their_numbered_items() {
        let (_, user) = build_prompt(QueryKind::Top, "q", "c");
        assert!(user.contains("5. **Visualization Suggestion**"));

        let (_, user) = build_prompt(QueryKind::Compare, "q", "c");
        assert!(user.contains("6. **Recommendations**"));

        let (_, user) = build_prompt(QueryKind::Trend, "q", "c");
        assert!(user.contains("6. **Trend Breakdown**"));
        assert!(user.contains("7. **Forecast Insight**"));
        assert!(user.contains("month-over-month or period comparisons"));

        let (_, user) = build_prompt(QueryKind::Profit, "q", "c");
        assert!(user.contains("perform a profitability analysis"));
        assert!(user.contains("7. **Recommendations**"));

        let (_, user) = build_prompt(QueryKind::Region, "q", "c");
        assert!(user.contains("perform a geographic/regional analysis"));
        assert!(user.contains("5. **Market Penetration**"));
        assert!(user.contains("7. **Opportunities**"));

        let (_, user) = build_prompt(QueryKind::Custom, "q", "c");
        assert!(user.contains("- Recommendations if applicable"));
    }

    #[test]
    fn test_specialist_system_messages() {
        let (system, _) = build_prompt(QueryKind::Profit, "q", "c");
        assert!(system.starts_with("You are a financial analyst expert."));

        let (system, _) = build_prompt(QueryKind::Region, "q", "c");
        assert!(system.starts_with("You are a market analyst expert"));
    }
}
