//! Post-game advisory text
//!
//! One fire-and-forget request per game over, resolved into a single-slot
//! cell the game-over screen reads. The simulation never waits on it. Every
//! failure mode (network, HTTP status, parse) degrades to a fixed fallback
//! pair. A round generation counter guards the slot: a response that arrives
//! after the next round has already started is dropped instead of
//! overwriting newer state.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Advisory endpoint; queried as `?score=..&level=..`
pub const ADVICE_ENDPOINT: &str = "/api/pilot-advice";

/// What the debrief screen shows: a callsign and one line of advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotAdvice {
    pub title: String,
    pub advice: String,
}

impl PilotAdvice {
    /// Substituted whenever the service is unreachable or talks nonsense
    pub fn fallback() -> Self {
        Self {
            title: "Rookie One".to_string(),
            advice: "Keep moving and watch your six. The belt is unforgiving.".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct SlotInner {
    generation: u64,
    result: Option<PilotAdvice>,
}

/// Single-slot advisory result cell, shared between the shell and the
/// in-flight request
#[derive(Debug, Clone, Default)]
pub struct AdviceSlot {
    inner: Rc<RefCell<SlotInner>>,
}

impl AdviceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate any in-flight request and clear the slot; returns the
    /// generation token the next request must present on delivery
    pub fn reset(&self) -> u64 {
        let mut inner = self.inner.borrow_mut();
        inner.generation += 1;
        inner.result = None;
        inner.generation
    }

    /// Store a response if its generation is still current.
    /// Returns false when the response was stale and dropped.
    pub fn deliver(&self, generation: u64, advice: PilotAdvice) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.generation != generation {
            return false;
        }
        inner.result = Some(advice);
        true
    }

    /// The resolved advice, if it has arrived for the current round
    pub fn current(&self) -> Option<PilotAdvice> {
        self.inner.borrow().result.clone()
    }
}

/// Kick off the advisory request for a finished round (WASM only).
/// Fire-and-forget: the future resolves into the slot, or not at all if the
/// round generation moved on.
#[cfg(target_arch = "wasm32")]
pub fn request(slot: AdviceSlot, generation: u64, score: u64, level: u32) {
    wasm_bindgen_futures::spawn_local(async move {
        let advice = match fetch_advice(score, level).await {
            Ok(advice) => advice,
            Err(err) => {
                log::warn!("advisory fetch failed: {err:?}");
                PilotAdvice::fallback()
            }
        };
        if !slot.deliver(generation, advice) {
            log::info!("stale advisory response dropped");
        }
    });
}

#[cfg(target_arch = "wasm32")]
async fn fetch_advice(score: u64, level: u32) -> Result<PilotAdvice, wasm_bindgen::JsValue> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;

    let url = format!("{ADVICE_ENDPOINT}?score={score}&level={level}");
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(&url)).await?;
    let response: web_sys::Response = response.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("status {}", response.status())));
    }
    let body = JsFuture::from(response.text()?).await?;
    let body = body.as_string().ok_or_else(|| JsValue::from_str("non-text body"))?;
    serde_json::from_str(&body).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Native stub: resolve immediately with the fallback pair
#[cfg(not(target_arch = "wasm32"))]
pub fn request(slot: AdviceSlot, generation: u64, _score: u64, _level: u32) {
    slot.deliver(generation, PilotAdvice::fallback());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_fills_the_slot() {
        let slot = AdviceSlot::new();
        let generation = slot.reset();
        assert_eq!(slot.current(), None);
        assert!(slot.deliver(generation, PilotAdvice::fallback()));
        assert_eq!(slot.current(), Some(PilotAdvice::fallback()));
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let slot = AdviceSlot::new();
        let first = slot.reset();
        // A new round starts before the response lands
        let second = slot.reset();

        let stale = PilotAdvice { title: "Ghost".into(), advice: "From last round.".into() };
        assert!(!slot.deliver(first, stale));
        assert_eq!(slot.current(), None);

        assert!(slot.deliver(second, PilotAdvice::fallback()));
        assert_eq!(slot.current(), Some(PilotAdvice::fallback()));
    }

    #[test]
    fn test_reset_clears_a_resolved_slot() {
        let slot = AdviceSlot::new();
        let generation = slot.reset();
        slot.deliver(generation, PilotAdvice::fallback());
        slot.reset();
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn test_fallback_payload_parses_like_the_service_response() {
        let json = r#"{"title":"Viper Two","advice":"Lead your targets."}"#;
        let parsed: PilotAdvice = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.title, "Viper Two");
        // And the fallback itself is a complete pair
        let fallback = PilotAdvice::fallback();
        assert!(!fallback.title.is_empty());
        assert!(!fallback.advice.is_empty());
    }
}
