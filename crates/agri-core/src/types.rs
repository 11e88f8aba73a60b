//! # Domain Types
//!
//! Core domain types shared by the stores and the frontend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Session     │   │     Address     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  user?          │   │  id (UUID)      │       │
//! │  │  name, brand    │   │  is_loading     │   │  name, phone    │       │
//! │  │  price (Money)  │   └─────────────────┘   │  line1, line2?  │       │
//! │  │  stock          │                         │  city, state    │       │
//! │  └─────────────────┘                         │  pincode        │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │PaymentSelection │   │ProfileSettings  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Upi            │   │  language       │       │
//! │  │  1800 = 18%     │   │  Card           │   │  notifications  │       │
//! │  └─────────────────┘   │  NetBanking     │   │  two_factor     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// 1 basis point = 0.01%, so GST at 18% is `Rate::from_bps(1800)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a whole percentage.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Rate(percent * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product that can be put in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub price: Money,
    /// Price before discount, shown struck through.
    pub original_price: Option<Money>,
    pub image: String,
    pub stock: i64,
    pub variant: Option<String>,
}

impl Product {
    /// Checks if any units are available.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated storefront user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
}

impl User {
    /// First character of the name, used for the avatar fallback.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

/// Current authentication state.
///
/// ## States
/// ```text
///  user: None,    is_loading: false   → signed out
///  user: None,    is_loading: true    → login/register pending
///  user: Some(_), is_loading: false   → signed in
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl Session {
    /// A session is authenticated exactly when it carries a user.
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Login form payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Address
// =============================================================================

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub is_default: bool,
}

impl Address {
    /// Builds a saved address from validated form input.
    pub fn from_input(id: String, input: AddressInput) -> Self {
        let line2 = input
            .address_line2
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Address {
            id,
            name: input.name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            address_line1: input.address_line1.trim().to_string(),
            address_line2: line2,
            city: input.city.trim().to_string(),
            state: input.state.trim().to_string(),
            pincode: input.pincode.trim().to_string(),
            is_default: false,
        }
    }

    /// Single-line rendering: `line1, line2, city, state - pincode`.
    pub fn one_line(&self) -> String {
        let mut out = self.address_line1.clone();
        if let Some(line2) = &self.address_line2 {
            out.push_str(", ");
            out.push_str(line2);
        }
        format!("{}, {}, {} - {}", out, self.city, self.state, self.pincode)
    }
}

/// New-address form payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddressInput {
    pub name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

// =============================================================================
// Payment
// =============================================================================

/// Banks offered for net banking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Bank {
    Sbi,
    Hdfc,
    Icici,
    Axis,
    Pnb,
}

impl Bank {
    /// Full bank name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Bank::Sbi => "State Bank of India",
            Bank::Hdfc => "HDFC Bank",
            Bank::Icici => "ICICI Bank",
            Bank::Axis => "Axis Bank",
            Bank::Pnb => "Punjab National Bank",
        }
    }
}

/// Payment step payload.
///
/// Card details are only held for the lifetime of the checkout draft;
/// placed orders keep [`PaymentSelection::masked`] instead.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "method", rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentSelection {
    Upi {
        #[serde(rename = "upiId")]
        upi_id: String,
    },
    Card {
        number: String,
        holder: String,
        expiry: String,
        cvv: String,
    },
    #[serde(rename = "netbanking")]
    NetBanking { bank: Bank },
}

impl PaymentSelection {
    /// Human-readable method name.
    pub fn method_name(&self) -> &'static str {
        match self {
            PaymentSelection::Upi { .. } => "UPI",
            PaymentSelection::Card { .. } => "Credit/Debit Card",
            PaymentSelection::NetBanking { .. } => "Net Banking",
        }
    }

    /// Label safe to persist and display: card numbers reduced to the last
    /// four digits, CVV dropped.
    pub fn masked(&self) -> String {
        match self {
            PaymentSelection::Upi { upi_id } => format!("UPI ({})", upi_id.trim()),
            PaymentSelection::Card { number, .. } => {
                let digits: Vec<char> = number.chars().filter(|c| c.is_ascii_digit()).collect();
                let last4: String = digits[digits.len().saturating_sub(4)..].iter().collect();
                format!("Card ending {}", last4)
            }
            PaymentSelection::NetBanking { bank } => {
                format!("Net Banking ({})", bank.display_name())
            }
        }
    }
}

// Card numbers and CVVs must never reach the logs.
impl std::fmt::Debug for PaymentSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PaymentSelection").field(&self.masked()).finish()
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Preferred interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Language {
    #[default]
    En,
    Hi,
}

/// Notification channel switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NotificationPreferences {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        NotificationPreferences {
            email: true,
            sms: true,
            push: false,
        }
    }
}

/// Editable account profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfileSettings {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default)]
    pub two_factor: bool,
}

impl ProfileSettings {
    /// Profile pre-filled from the signed-in user.
    pub fn for_user(user: &User) -> Self {
        ProfileSettings {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            ..ProfileSettings::default()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_percent() {
        let rate = Rate::from_percent(18);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_session_default_is_signed_out() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(!session.is_loading);
    }

    #[test]
    fn test_address_one_line() {
        let input = AddressInput {
            name: "Rajesh Patel".to_string(),
            phone: "+91 98765 43210".to_string(),
            address_line1: "Farm House, Village Kheda".to_string(),
            address_line2: Some("  ".to_string()),
            city: "Anand".to_string(),
            state: "Gujarat".to_string(),
            pincode: "388001".to_string(),
        };
        let address = Address::from_input("a1".to_string(), input);

        assert_eq!(address.address_line2, None);
        assert_eq!(
            address.one_line(),
            "Farm House, Village Kheda, Anand, Gujarat - 388001"
        );
    }

    #[test]
    fn test_payment_masking() {
        let card = PaymentSelection::Card {
            number: "4111 1111 1111 1234".to_string(),
            holder: "R Patel".to_string(),
            expiry: "12/29".to_string(),
            cvv: "987".to_string(),
        };
        assert_eq!(card.masked(), "Card ending 1234");
        assert!(!format!("{:?}", card).contains("987"));

        let bank = PaymentSelection::NetBanking { bank: Bank::Hdfc };
        assert_eq!(bank.masked(), "Net Banking (HDFC Bank)");
    }

    #[test]
    fn test_payment_selection_wire_format() {
        let upi: PaymentSelection =
            serde_json::from_str(r#"{"method":"upi","upiId":"raj@paytm"}"#).unwrap();
        assert_eq!(
            upi,
            PaymentSelection::Upi {
                upi_id: "raj@paytm".to_string()
            }
        );

        let nb: PaymentSelection =
            serde_json::from_str(r#"{"method":"netbanking","bank":"sbi"}"#).unwrap();
        assert_eq!(nb, PaymentSelection::NetBanking { bank: Bank::Sbi });
    }
}
