//! Unit tests for price history rendering and news result parsing.

#[cfg(test)]
mod price_history_tests {
    use crate::data::yahoo::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(date: NaiveDate, close: f64, volume: u64) -> PriceBar {
        PriceBar {
            date,
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            adj_close: close,
            volume,
        }
    }

    fn history(n: usize) -> PriceHistory {
        let start = day(2025, 1, 1);
        PriceHistory {
            ticker: "AAPL".to_string(),
            start,
            end: day(2026, 1, 1),
            bars: (0..n)
                .map(|i| bar(start + chrono::Duration::days(i as i64), 100.0 + i as f64, 1_000))
                .collect(),
        }
    }

    #[test]
    fn test_history_window_is_one_year_back() {
        let (start, end) = history_window(day(2026, 10, 19), 365);
        assert_eq!(start, day(2025, 10, 19));
        assert_eq!(end, day(2026, 10, 19));
    }

    #[test]
    fn test_history_window_across_leap_day() {
        let (start, end) = history_window(day(2024, 3, 1), 365);
        assert_eq!(start, day(2023, 3, 2));
        assert_eq!(end, day(2024, 3, 1));
    }

    #[test]
    fn test_exchange_date_uses_exchange_offset() {
        use chrono::{TimeZone, Utc};

        // NZX opens 10:00 NZDT, which is still the previous day in UTC
        let nzx_open = Utc.with_ymd_and_hms(2026, 10, 18, 21, 0, 0).unwrap().timestamp();
        assert_eq!(exchange_date(nzx_open, 46_800), Some(day(2026, 10, 19)));
        assert_eq!(exchange_date(nzx_open, 0), Some(day(2026, 10, 18)));

        let nyse_open = Utc.with_ymd_and_hms(2026, 10, 19, 13, 30, 0).unwrap().timestamp();
        assert_eq!(exchange_date(nyse_open, -14_400), Some(day(2026, 10, 19)));

        assert_eq!(exchange_date(i64::MAX, 1), None);
    }

    #[test]
    fn test_summary() {
        let mut h = history(3);
        h.bars[1].high = 150.0;
        h.bars[2].low = 50.0;
        h.bars[2].volume = 4_000;

        let s = h.summary().unwrap();
        assert_eq!(s.first_close, 100.0);
        assert_eq!(s.last_close, 102.0);
        assert!((s.change_pct - 2.0).abs() < 1e-9);
        assert_eq!(s.period_high, 150.0);
        assert_eq!(s.period_low, 50.0);
        assert_eq!(s.average_volume, 2_000.0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(history(0).summary().is_none());
    }

    #[test]
    fn test_short_table_shows_every_row() {
        let table = history(3).to_table(60);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].starts_with("Date"));
        assert!(lines[0].contains("Adj Close"));
        assert!(lines[1].starts_with("2025-01-01"));
        assert!(lines[3].starts_with("2025-01-03"));
        assert!(!table.contains("..."));
        assert!(table.ends_with("[3 rows x 6 columns]"));
    }

    #[test]
    fn test_long_table_is_abbreviated() {
        let h = history(250);
        let table = h.to_table(60);

        // header + 5 head + ellipsis + 5 tail
        let data_lines = table.lines().take_while(|l| !l.is_empty()).count();
        assert_eq!(data_lines, 12);
        assert!(table.contains("..."));
        assert!(table.contains("2025-01-01"));
        assert!(!table.contains("2025-01-06"));
        let last = h.bars.last().unwrap().date.format("%Y-%m-%d").to_string();
        assert!(table.contains(&last));
        assert!(table.ends_with("[250 rows x 6 columns]"));
    }

    #[test]
    fn test_render_includes_summary() {
        let out = history(2).render(60);
        assert!(out.starts_with("Price history for AAPL from 2025-01-01 to 2026-01-01"));
        assert!(out.contains("Change: +1.00%"));
        assert!(out.contains("Date"));
    }
}

#[cfg(test)]
mod news_tests {
    use crate::data::duckduckgo::*;

    const NEWS_JSON: &str = r#"{
        "results": [
            {"date": 1760000000, "title": "Apple beats estimates", "excerpt": "Revenue rose", "url": "https://example.com/a", "source": "Reuters", "image": "x"},
            {"date": 1760000100, "title": "Duplicate", "excerpt": "Same link", "url": "https://example.com/a", "source": "AP"},
            {"date": 1760000200, "title": "Bitcoin rallies", "excerpt": "BTC up", "url": "https://example.com/b", "source": "CoinDesk"},
            {"title": "No link", "excerpt": "dropped", "url": ""}
        ]
    }"#;

    #[test]
    fn test_extract_vqd_double_quotes() {
        let body = r#"<script>var x = {vqd="4-123456789012345678901234567890", foo: 1}</script>"#;
        assert_eq!(
            extract_vqd(body).as_deref(),
            Some("4-123456789012345678901234567890")
        );
    }

    #[test]
    fn test_extract_vqd_single_quotes_and_query_param() {
        assert_eq!(extract_vqd("vqd='4-99'").as_deref(), Some("4-99"));
        assert_eq!(
            extract_vqd("/d.js?q=aapl&vqd=4-1234&kl=wt-wt").as_deref(),
            Some("4-1234")
        );
    }

    #[test]
    fn test_extract_vqd_missing() {
        assert!(extract_vqd("<html>nothing here</html>").is_none());
    }

    #[test]
    fn test_extract_vqd_repeated_calls() {
        for i in 0..3 {
            let body = format!(r#"vqd="4-{}""#, i);
            assert_eq!(extract_vqd(&body), Some(format!("4-{}", i)));
        }
    }

    #[test]
    fn test_safesearch_param() {
        assert_eq!(safesearch_param("moderate"), "-1");
        assert_eq!(safesearch_param("OFF"), "-2");
        assert_eq!(safesearch_param("on"), "1");
        assert_eq!(safesearch_param("whatever"), "-1");
    }

    #[test]
    fn test_parse_news_response_dedups_and_limits() {
        let articles = parse_news_response(NEWS_JSON, 10).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Apple beats estimates");
        assert_eq!(articles[1].source, "CoinDesk");

        let limited = parse_news_response(NEWS_JSON, 1).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_parse_news_response_without_results() {
        assert!(parse_news_response("{}", 10).unwrap().is_empty());
        assert!(parse_news_response("not json", 10).is_err());
    }

    #[test]
    fn test_format_news_results() {
        let articles = parse_news_response(NEWS_JSON, 10).unwrap();
        let text = format_news_results(&articles);

        assert!(text.starts_with("[snippet: Revenue rose, title: Apple beats estimates, link: https://example.com/a, date: 2025-10-09T"));
        assert!(text.contains("source: Reuters], [snippet: BTC up"));
        assert!(text.ends_with("source: CoinDesk]"));
    }

    #[test]
    fn test_format_news_results_without_date() {
        let articles = parse_news_response(
            r#"{"results": [{"title": "Undated", "excerpt": "x", "url": "https://example.com/u", "source": "Wire"}]}"#,
            10,
        )
        .unwrap();

        assert_eq!(
            format_news_results(&articles),
            "[snippet: x, title: Undated, link: https://example.com/u, date: , source: Wire]"
        );
    }

    #[test]
    fn test_format_news_results_empty() {
        assert_eq!(
            format_news_results(&[]),
            "No good DuckDuckGo Search Result was found"
        );
    }
}
