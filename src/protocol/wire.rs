//! Card payloads on the wire.
//!
//! A card travels as a flat JSON object:
//!
//! ```json
//! {"id": "…", "isVisible": true, "isSelected": false, "isDiscarded": false,
//!  "color": "red", "shape": "oval", "number": "2", "shading": "solid"}
//! ```
//!
//! Feature values are resolved against the receiver's configuration, never
//! trusted as-is:
//! - numeric features accept JSON numbers or numeric strings
//! - colors accept `c1`..`c4` as positional aliases
//! - values outside the active domain are rejected

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProtocolError;
use crate::cards::{Card, Deck, Feature, FeatureValue, FeatureValues};
use crate::core::config::GameConfig;
use crate::core::ids::CardId;

/// A card as sent or received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireCard {
    pub id: CardId,

    #[serde(rename = "isVisible", default)]
    pub visible: bool,

    #[serde(rename = "isSelected", default)]
    pub selected: bool,

    #[serde(rename = "isDiscarded", default)]
    pub discarded: bool,

    /// Every other key. Feature values live here.
    #[serde(flatten)]
    pub features: BTreeMap<String, Value>,
}

impl WireCard {
    /// Resolve into a `Card` under `config`.
    pub fn into_card(self, config: &GameConfig) -> Result<Card, ProtocolError> {
        let mut values = FeatureValues::new();

        for &feature in config.features() {
            let raw = std::iter::once(feature.wire_key())
                .chain(feature.wire_aliases().iter().copied())
                .find_map(|key| self.features.get(key))
                .ok_or_else(|| ProtocolError::InvalidCard {
                    card: self.id,
                    reason: format!("missing {}", feature),
                })?;

            let value = resolve(feature, raw, config).ok_or_else(|| ProtocolError::InvalidCard {
                card: self.id,
                reason: format!("{} value {} not in play", feature, raw),
            })?;
            values.push((feature, value));
        }

        let mut card = Card::new(self.id, values);
        card.visible = self.visible;
        card.selected = self.selected;
        card.discarded = self.discarded;
        Ok(card)
    }
}

fn resolve(feature: Feature, raw: &Value, config: &GameConfig) -> Option<FeatureValue> {
    let rotation = config.rotation();
    let value = match raw {
        Value::String(text) => feature.lookup_text(text, rotation),
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .and_then(|n| feature.lookup_number(n, rotation)),
        _ => None,
    }?;
    config.allows(feature, value).then_some(value)
}

impl From<&Card> for WireCard {
    fn from(card: &Card) -> Self {
        let features = card
            .values()
            .iter()
            .map(|(feature, value)| {
                let json = match value {
                    FeatureValue::Number(n) => Value::from(*n),
                    FeatureValue::Named(s) => Value::from(*s),
                };
                (feature.wire_key().to_string(), json)
            })
            .collect();

        Self {
            id: card.id,
            visible: card.visible,
            selected: card.selected,
            discarded: card.discarded,
            features,
        }
    }
}

/// Encode a whole deck.
#[must_use]
pub fn encode_deck(deck: &Deck) -> Vec<WireCard> {
    deck.iter().map(WireCard::from).collect()
}

/// Decode a whole deck, failing on the first invalid card.
pub fn decode_deck(cards: Vec<WireCard>, config: &GameConfig) -> Result<Deck, ProtocolError> {
    let cards = cards
        .into_iter()
        .map(|card| card.into_card(config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Deck::from_cards(cards))
}
