//! How each record kind is laid out in the terminal

use chrono::{DateTime, Utc};
use readywall_client::entities::Activation;
use readywall_client::{Entity, StatusTone};
use readywall_core::utils::{format_local_timestamp, initials};
use readywall_core::{Blog, Inquiry, Lead, Product, User};

/// A record kind with a list screen
pub trait Screen: Entity {
    /// Column headings
    const COLUMNS: &'static [&'static str];

    /// One table row, matching [`Screen::COLUMNS`]
    fn row(&self) -> Vec<String>;

    /// Images shown in the detail carousel
    fn gallery_refs(&self) -> Vec<&str> {
        Vec::new()
    }
}

fn timestamp(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(String::new, format_local_timestamp)
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

impl Screen for Lead {
    const COLUMNS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "COMPANY", "STATUS", "CREATED"];

    fn row(&self) -> Vec<String> {
        let tone = match StatusTone::for_lead(&self.status) {
            StatusTone::Green => "+",
            StatusTone::Red => "x",
            _ => " ",
        };
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.company.clone(),
            format!("{tone} {}", self.status),
            timestamp(self.created_at.as_ref()),
        ]
    }
}

impl Screen for Product {
    const COLUMNS: &'static [&'static str] =
        &["ID", "NAME", "CATEGORY", "PRICE", "UNIT", "STOCK", "AVAILABLE"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            or_dash(self.category.as_ref().map(ToString::to_string)),
            or_dash(self.price.map(|price| format!("{price:.2}"))),
            or_dash(self.unit.as_ref().map(ToString::to_string)),
            or_dash(self.stock.map(|stock| stock.to_string())),
            if self.is_available { "yes" } else { "no" }.to_string(),
        ]
    }

    fn gallery_refs(&self) -> Vec<&str> {
        self.gallery()
    }
}

impl Screen for Blog {
    const COLUMNS: &'static [&'static str] = &["ID", "TITLE", "CATEGORY", "AUTHOR", "CREATED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.category.to_string(),
            self.author.clone(),
            timestamp(self.created_at.as_ref()),
        ]
    }

    fn gallery_refs(&self) -> Vec<&str> {
        self.gallery()
    }
}

impl Screen for Inquiry {
    const COLUMNS: &'static [&'static str] =
        &["ID", "NAME", "EMAIL", "PHONE", "INTEREST", "STATUS", "RECEIVED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name(),
            self.email.clone(),
            self.phone.clone(),
            self.product_interest.clone(),
            self.status.to_string(),
            timestamp(self.created_at.as_ref()),
        ]
    }
}

impl Screen for User {
    const COLUMNS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "ROLE", "STATUS", "JOINED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            format!("[{}] {}", initials(&self.name), self.name),
            self.email.clone(),
            self.role.clone(),
            Activation::from(self.is_active).to_string(),
            timestamp(self.created_at.as_ref()),
        ]
    }
}
