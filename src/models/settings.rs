// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;

/// The time box controlling official test availability, stored under the
/// 'official_test' key of 'app_settings'.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfficialTestWindow {
    /// Explicit on/off switch; overrides the date bounds when set.
    #[serde(default)]
    pub active: bool,

    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl OfficialTestWindow {
    /// The test is available if explicitly active, or if either bound is set
    /// and `now` falls within the bounds that are present.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        if self.active {
            return true;
        }
        if self.start.is_none() && self.end.is_none() {
            return false;
        }
        self.start.is_none_or(|start| now >= start) && self.end.is_none_or(|end| now <= end)
    }
}

const OFFICIAL_TEST_KEY: &str = "official_test";

/// Loads the official test window. A missing settings row reads as a closed
/// window, not an error.
pub async fn load_official_window(pool: &PgPool) -> Result<OfficialTestWindow, sqlx::Error> {
    let row: Option<Json<OfficialTestWindow>> = sqlx::query_scalar(
        "SELECT setting_value FROM app_settings WHERE setting_key = $1",
    )
    .bind(OFFICIAL_TEST_KEY)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|Json(window)| window).unwrap_or_default())
}

/// Stores the official test window (upsert).
pub async fn store_official_window(
    pool: &PgPool,
    window: &OfficialTestWindow,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO app_settings (setting_key, setting_value)
        VALUES ($1, $2)
        ON CONFLICT (setting_key) DO UPDATE SET setting_value = EXCLUDED.setting_value
        "#,
    )
    .bind(OFFICIAL_TEST_KEY)
    .bind(Json(window))
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn inactive_without_bounds_is_closed() {
        let window = OfficialTestWindow::default();
        assert!(!window.is_open(at(12)));
    }

    #[test]
    fn explicit_active_overrides_bounds() {
        let window = OfficialTestWindow {
            active: true,
            start: Some(at(20)),
            end: None,
        };
        assert!(window.is_open(at(12)));
    }

    #[test]
    fn bounded_window_opens_only_inside_bounds() {
        let window = OfficialTestWindow {
            active: false,
            start: Some(at(10)),
            end: Some(at(14)),
        };
        assert!(!window.is_open(at(9)));
        assert!(window.is_open(at(10)));
        assert!(window.is_open(at(12)));
        assert!(window.is_open(at(14)));
        assert!(!window.is_open(at(15)));
    }

    #[test]
    fn single_bound_is_half_open() {
        let from_ten = OfficialTestWindow {
            active: false,
            start: Some(at(10)),
            end: None,
        };
        assert!(!from_ten.is_open(at(9)));
        assert!(from_ten.is_open(at(23)));

        let until_ten = OfficialTestWindow {
            active: false,
            start: None,
            end: Some(at(10)),
        };
        assert!(until_ten.is_open(at(1)));
        assert!(!until_ten.is_open(at(11)));
    }
}
