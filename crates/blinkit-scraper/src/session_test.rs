use super::*;

fn config_with_base(base_url: &str) -> AppConfig {
    AppConfig {
        base_url: base_url.to_owned(),
        categories_path: "blinkit_categories.csv".into(),
        locations_path: "blinkit_locations.csv".into(),
        output_dir: "output".into(),
        log_level: "info".to_owned(),
        user_agent: "blinkit-test/0.1".to_owned(),
        request_timeout_secs: None,
        inter_request_delay_ms: 0,
        warmup_delay_ms: 0,
    }
}

#[test]
fn open_strips_path_from_base_url() {
    let session = BrowserSession::open(&config_with_base("https://blinkit.com/cn/milk")).unwrap();
    assert_eq!(session.origin, "https://blinkit.com");
    assert_eq!(session.referer(), "https://blinkit.com/");
}

#[test]
fn new_accepts_explicit_timeout() {
    let session = BrowserSession::new("https://blinkit.com", "blinkit-test/0.1", Some(10), 0);
    assert!(session.is_ok());
}

#[test]
fn warmup_delay_is_kept_in_millis() {
    let session = BrowserSession::new("https://blinkit.com", "blinkit-test/0.1", None, 1500).unwrap();
    assert_eq!(session.warmup_delay, Duration::from_millis(1500));
}

#[test]
fn new_rejects_base_url_without_host() {
    let result = BrowserSession::new("blinkit.com", "blinkit-test/0.1", None, 0);
    assert!(
        matches!(result, Err(ScraperError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}
