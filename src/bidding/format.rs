/// 금액, 시간 표시 포맷
// region:    --- Imports
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rusty_money::{iso, Formatter, Money, Params, Position};

// endregion: --- Imports

/// 금액이 없을 때 표시하는 문구
pub const NO_BIDS: &str = "No bids";

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

// region:    --- Money
/// 최소 통화 단위 금액 -> 표시 문자열
///
/// 통화 지수와 무관하게 100으로 나눠 소수점 둘째 자리까지 표시하고 정수부는 천 단위로 묶는다.
/// 예: `500000`, `"QAR"` -> `"5,000.00 QAR"`
pub fn format_minor(amount_minor: Option<i64>, currency: &str) -> String {
    let Some(amount_minor) = amount_minor else {
        return NO_BIDS.to_string();
    };

    let amount = Decimal::new(amount_minor, 2);
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };

    match iso::find(currency) {
        Some(iso_currency) => {
            let money = Money::from_decimal(amount.abs(), iso_currency);
            format!(
                "{}{}",
                sign,
                Formatter::money(
                    &money,
                    money_params(
                        &[Position::Amount, Position::Space, Position::Code],
                        Some(iso_currency.iso_alpha_code),
                    ),
                )
            )
        }
        // ISO 코드가 아니면 금액만 포맷하고 코드는 그대로 붙인다
        None => {
            let money = Money::from_decimal(amount.abs(), iso::USD);
            let digits = Formatter::money(&money, money_params(&[Position::Amount], None));
            format!("{}{} {}", sign, digits, currency)
        }
    }
}

fn money_params<'a>(positions: &'a [Position], code: Option<&'static str>) -> Params<'a> {
    Params {
        digit_separator: ',',
        exponent_separator: '.',
        separator_pattern: &[3, 3, 3],
        positions,
        rounding: Some(2),
        code,
        ..Default::default()
    }
}
// endregion: --- Money

// region:    --- Time
/// 남은 시간 표시
///
/// `end_at <= now` 이면 `"Ended DD/MM/YYYY"`, 아니면 `"{d}d : {h}h : {m}m"` (내림, 초 단위 버림).
pub fn time_left(end_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if end_at <= now {
        return format!("Ended {}", end_at.format("%d/%m/%Y"));
    }

    let remaining = (end_at - now).num_milliseconds();
    let days = remaining / MS_PER_DAY;
    let hours = (remaining % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (remaining % MS_PER_HOUR) / MS_PER_MINUTE;

    format!("{}d : {}h : {}m", days, hours, minutes)
}

/// 경매 기간 표시, 일 단위 올림 (`"1 Day"`, `"3 Days"`)
///
/// `end_at <= start_at` 인 입력은 호출 전에 검증되어야 한다.
pub fn duration(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> String {
    let span = (end_at - start_at).num_milliseconds();
    let days = if span > 0 {
        (span + MS_PER_DAY - 1) / MS_PER_DAY
    } else {
        span / MS_PER_DAY
    };

    if days == 1 {
        "1 Day".to_string()
    } else {
        format!("{} Days", days)
    }
}
// endregion: --- Time

// endregion: --- Tests
