// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Grouping labels for transactions.
//!
//! Both domains ship a default set and accept any user-defined name through
//! the `Custom` variant. On the wire and in the database they are plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! open_label {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Custom(String),
        }

        impl $name {
            pub const DEFAULTS: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Custom(s) => s,
                }
            }

            pub fn is_custom(&self) -> bool {
                matches!(self, $name::Custom(_))
            }

            /// Empty or whitespace-only labels carry no grouping information.
            pub fn is_blank(&self) -> bool {
                self.as_str().trim().is_empty()
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $($text => $name::$variant,)+
                    _ => $name::Custom(s),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(label: $name) -> String {
                match label {
                    $name::Custom(s) => s,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_label! {
    /// Where income came from. Also used as the payment source of an expense.
    IncomeSource {
        Salary => "Salary",
        Freelance => "Freelance",
        Family => "Family",
        CreditCard => "Credit Card",
    }
}

open_label! {
    ExpenseCategory {
        HouseRent => "House Rent",
        ElectricityBill => "Electricity Bill",
        InternetBill => "Internet Bill",
        Grocery => "Grocery",
        Transport => "Transport",
        MobileBill => "Mobile Bill",
        Entertainment => "Entertainment",
        Medical => "Medical",
        Savings => "Savings",
        Other => "Other",
    }
}

/// Turns optional raw text into a label, treating blank input as absent.
pub fn label_from_input<L: From<String>>(raw: Option<&str>) -> Option<L> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| L::from(s.to_string()))
}
