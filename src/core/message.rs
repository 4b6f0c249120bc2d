//! Message formatting for the WhatsApp handoff.
//!
//! A finalized booking is rendered into a fixed-layout text block and
//! embedded, percent-encoded, into a `wa.me`-style deep link addressed to the
//! restaurant's number. Decoding the link's `text` parameter yields the exact
//! message again.

use crate::core::booking::BookingDetail;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// How money is rendered: prefix symbol and thousands separator, no decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Symbol placed before the amount (e.g., "Rp")
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Thousands separator (e.g., '.')
    #[serde(default = "default_group_separator")]
    pub group_separator: char,
}

fn default_symbol() -> String {
    "Rp".to_string()
}

const fn default_group_separator() -> char {
    '.'
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            group_separator: default_group_separator(),
        }
    }
}

/// Formats `amount` as `Rp 1.234.567` (negative: `-Rp 5.000`).
#[must_use]
pub fn format_currency(amount: i64, format: &CurrencyFormat) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(format.group_separator);
        }
        grouped.push(digit);
    }

    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{} {grouped}", format.symbol)
}

const DAY_NAMES: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Long Indonesian date, e.g. `Senin, 10 Maret 2025`.
#[must_use]
pub fn format_date_long(date: NaiveDate) -> String {
    let day = DAY_NAMES[weekday_index(date.weekday())];
    let month = MONTH_NAMES[date.month0() as usize];
    format!("{day}, {} {month} {}", date.day(), date.year())
}

const fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// One itemized line of the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOrderLine {
    /// Menu item name
    pub menu_name: String,
    /// Number of portions
    pub quantity: i32,
    /// Flattened option description
    pub selected_options: Option<String>,
    /// Line subtotal
    pub subtotal: i64,
}

/// Everything the message needs about a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    /// Name of the person booking
    pub customer_name: String,
    /// Customer phone as entered
    pub phone: String,
    /// Optional Instagram handle
    pub instagram: Option<String>,
    /// Date of the iftar
    pub booking_date: NaiveDate,
    /// Party size
    pub pax: i32,
    /// Chosen seating
    pub seating: String,
    /// Itemized order
    pub order_items: Vec<MessageOrderLine>,
    /// Order total
    pub total_amount: i64,
    /// Required deposit
    pub dp_amount: i64,
    /// Externally reachable payment proof URL
    pub payment_proof_url: Option<String>,
}

impl BookingSummary {
    /// Builds a summary from a persisted booking.
    ///
    /// A relative proof path (e.g. `/uploads/abc.jpg`) is prefixed with
    /// `public_base_url` so the restaurant can open it from the chat.
    #[must_use]
    pub fn from_booking(detail: &BookingDetail, public_base_url: &str) -> Self {
        let booking = &detail.booking;
        let payment_proof_url = booking
            .payment_proof
            .as_deref()
            .filter(|proof| !proof.is_empty())
            .map(|proof| absolute_url(public_base_url, proof));

        Self {
            customer_name: booking.customer_name.clone(),
            phone: booking.phone.clone(),
            instagram: booking.instagram.clone(),
            booking_date: booking.booking_date,
            pax: booking.pax,
            seating: booking.seating.clone(),
            order_items: detail
                .order_items
                .iter()
                .map(|item| MessageOrderLine {
                    menu_name: item.menu_name.clone(),
                    quantity: item.quantity,
                    selected_options: item.selected_options.clone(),
                    subtotal: item.subtotal,
                })
                .collect(),
            total_amount: booking.total_amount,
            dp_amount: booking.dp_amount,
            payment_proof_url,
        }
    }
}

fn absolute_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || base.is_empty() {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Renders the booking message.
///
/// Layout, in order: title, customer block, itemized order, total, deposit,
/// optional proof link, closing line.
#[must_use]
pub fn format_booking_message(summary: &BookingSummary, currency: &CurrencyFormat) -> String {
    let order_details = summary
        .order_items
        .iter()
        .map(|item| {
            let options = item
                .selected_options
                .as_deref()
                .filter(|options| !options.is_empty())
                .map(|options| format!(" ({options})"))
                .unwrap_or_default();
            format!(
                "• {} x{}{options} - {}",
                item.menu_name,
                item.quantity,
                format_currency(item.subtotal, currency)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let instagram = summary
        .instagram
        .as_deref()
        .filter(|handle| !handle.is_empty())
        .unwrap_or("-");

    let mut message = format!(
        "🌙 *BOOKING BUKA PUASA* 🌙\n\
         \n\
         *DATA PEMESAN:*\n\
         📛 Nama: {name}\n\
         📱 WhatsApp: {phone}\n\
         📸 Instagram: {instagram}\n\
         📅 Tanggal: {date}\n\
         👥 Jumlah Orang: {pax} pax\n\
         🪑 Spot Duduk: {seating}\n\
         \n\
         *PESANAN:*\n\
         {order_details}\n\
         \n\
         💰 *TOTAL: {total}*\n\
         💳 *DP (50%): {dp}*\n",
        name = summary.customer_name,
        phone = summary.phone,
        date = format_date_long(summary.booking_date),
        pax = summary.pax,
        seating = summary.seating,
        total = format_currency(summary.total_amount, currency),
        dp = format_currency(summary.dp_amount, currency),
    );

    if let Some(url) = &summary.payment_proof_url {
        message.push_str(&format!("\n📎 Bukti Pembayaran: {url}\n"));
    }
    message.push_str("\nTerima kasih! 🙏");

    message.trim().to_string()
}

/// Keeps only the ASCII digits of a phone number.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// `<base>/<digits-only phone>?text=<percent-encoded message>`.
#[must_use]
pub fn generate_link(base_url: &str, phone: &str, message: &str) -> String {
    format!(
        "{}/{}?text={}",
        base_url.trim_end_matches('/'),
        normalize_phone(phone),
        urlencoding::encode(message)
    )
}
