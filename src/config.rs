use std::env;

use chrono::{FixedOffset, Weekday};

use crate::services::calendar::{offset_from_minutes, server_offset};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub codeforces_handle: String,
    pub codeforces_api_url: String,
    pub leetcode_graphql_url: String,
    pub http_timeout_secs: u64,

    /// Offset that decides where one tracked day ends and the next begins.
    pub utc_offset: FixedOffset,
    pub rest_days: Vec<Weekday>,
    pub rollover_check_secs: u64,
    pub leetcode_unlock_hour: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),

            codeforces_handle: env::var("CODEFORCES_HANDLE")
                .unwrap_or_else(|_| "RePhiKnowPubIMB".into()),
            codeforces_api_url: env::var("CODEFORCES_API_URL")
                .unwrap_or_else(|_| "https://codeforces.com/api".into()),
            leetcode_graphql_url: env::var("LEETCODE_GRAPHQL_URL")
                .unwrap_or_else(|_| "https://leetcode.com/graphql".into()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .unwrap_or(10),

            utc_offset: env::var("UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|raw| parse_utc_offset(&raw))
                .unwrap_or_else(server_offset),
            rest_days: parse_rest_days(
                &env::var("REST_DAYS").unwrap_or_else(|_| "fri,sat".into()),
            ),
            rollover_check_secs: env::var("ROLLOVER_CHECK_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .unwrap_or(60),
            leetcode_unlock_hour: env::var("LEETCODE_UNLOCK_HOUR")
                .unwrap_or_else(|_| "6".into())
                .parse()
                .unwrap_or(6),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:5173".into(),
            codeforces_handle: "RePhiKnowPubIMB".into(),
            codeforces_api_url: "https://codeforces.com/api".into(),
            leetcode_graphql_url: "https://leetcode.com/graphql".into(),
            http_timeout_secs: 10,
            utc_offset: server_offset(),
            rest_days: vec![Weekday::Fri, Weekday::Sat],
            rollover_check_secs: 60,
            leetcode_unlock_hour: 6,
        }
    }
}

/// Minutes east of UTC ("360", "-300"); out-of-range values are ignored.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let offset = raw.trim().parse::<i32>().ok().and_then(offset_from_minutes);
    if offset.is_none() {
        tracing::warn!(value = raw, "Ignoring invalid UTC_OFFSET_MINUTES; using server offset");
    }
    offset
}

/// Parses a comma-separated weekday list ("fri,sat"); unknown names are skipped.
pub fn parse_rest_days(raw: &str) -> Vec<Weekday> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<Weekday>() {
            Ok(day) => Some(day),
            Err(_) => {
                tracing::warn!(value = s, "Ignoring unknown rest day");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rest_days_default() {
        assert_eq!(parse_rest_days("fri,sat"), vec![Weekday::Fri, Weekday::Sat]);
    }

    #[test]
    fn test_parse_rest_days_tolerates_spaces_and_junk() {
        assert_eq!(
            parse_rest_days(" Sunday , xyz,mon,"),
            vec![Weekday::Sun, Weekday::Mon]
        );
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("360"), FixedOffset::east_opt(6 * 3600));
        assert_eq!(parse_utc_offset(" -300 "), FixedOffset::east_opt(-5 * 3600));
        assert_eq!(parse_utc_offset("Asia/Dhaka"), None);
        assert_eq!(parse_utc_offset("1440"), None);
    }

    #[test]
    fn test_listen_addr() {
        let config = Config {
            host: "0.0.0.0".into(),
            port: 5000,
            ..Default::default()
        };
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");
    }
}
