//! Localized user-facing text.
//!
//! Every string the window shows is looked up by [`MessageId`]. The built-in
//! table is Hungarian; individual entries can be overridden from the config
//! file using the snake_case id as key (e.g. `"warning_body"`).

use std::collections::HashMap;
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MessageId {
    AppTitle,
    WarningTitle,
    WarningBody,
    FailureTitle,
    InferenceFailedBody,
    RepositoryFailedBody,
    NoRecipesBody,
    IngredientsHeading,
    InstructionsHeading,
    ScannedObjectLabel,
    BrowseButton,
    AnalyzeButton,
    ShowRecipeButton,
    PreviousRecipeButton,
    NextRecipeButton,
    NextTipButton,
    OkButton,
    LoadingCaption,
    TipSharpPhoto,
    TipRawIngredient,
    TipLighting,
}

/// The fixed tip rotation, in display order.
pub const TIPS: [MessageId; 3] = [
    MessageId::TipSharpPhoto,
    MessageId::TipRawIngredient,
    MessageId::TipLighting,
];

fn default_text(id: MessageId) -> &'static str {
    match id {
        MessageId::AppTitle => "Foodee",
        MessageId::WarningTitle => "Figyelem",
        MessageId::WarningBody => "Nem sikerült semmit sem észlelni a képen.",
        MessageId::FailureTitle => "Hiba",
        MessageId::InferenceFailedBody => "A kép elemzése nem sikerült.",
        MessageId::RepositoryFailedBody => "A receptek betöltése nem sikerült.",
        MessageId::NoRecipesBody => "Ehhez a hozzávalóhoz nem található recept.",
        MessageId::IngredientsHeading => "Hozzávalók:",
        MessageId::InstructionsHeading => "Elkészítési útmutató:",
        MessageId::ScannedObjectLabel => "Felismert hozzávaló:",
        MessageId::BrowseButton => "Tallózás",
        MessageId::AnalyzeButton => "Elemzés",
        MessageId::ShowRecipeButton => "Receptek",
        MessageId::PreviousRecipeButton => "◀",
        MessageId::NextRecipeButton => "▶",
        MessageId::NextTipButton => "Következő tipp",
        MessageId::OkButton => "OK",
        MessageId::LoadingCaption => "Elemzés folyamatban...",
        MessageId::TipSharpPhoto => {
            "Törekedj arra, hogy minél pontosabb képet csinálj a hozzávalóról."
        }
        MessageId::TipRawIngredient => {
            "A legjobb eredmények érdekében feldolgozatlan állapotban fotózd le a hozzávalót."
        }
        MessageId::TipLighting => "Megfelelő fényviszonyok között pontosabb lesz az elemzés.",
    }
}

/// Message lookup table.
#[derive(Debug, Clone)]
pub struct Messages {
    table: HashMap<MessageId, String>,
}

impl Default for Messages {
    fn default() -> Self {
        let table = MessageId::iter()
            .map(|id| (id, default_text(id).to_string()))
            .collect();
        Self { table }
    }
}

impl Messages {
    /// Built-in table with `overrides` applied on top. Unknown keys are skipped.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut messages = Self::default();
        for (key, text) in overrides {
            match MessageId::from_str(key) {
                Ok(id) => {
                    messages.table.insert(id, text.clone());
                }
                Err(_) => tracing::warn!(key = %key, "ignoring unknown message id in config"),
            }
        }
        messages
    }

    pub fn get(&self, id: MessageId) -> &str {
        self.table
            .get(&id)
            .map(String::as_str)
            .unwrap_or_else(|| default_text(id))
    }

    pub fn tip(&self, index: usize) -> &str {
        self.get(TIPS[index % TIPS.len()])
    }
}
