use crate::classify::ParseError;
use crate::classify::capture::{owned, text};
use crate::event::{BigcommerceAppEvent, StoreContext};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// level + content + args + store context
static FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^BigcommerceApp\.(?P<level>.*?): (?P<content>.*?) ",
        r"(?P<args>\[\]|\{.*?\}) (?P<store>\{.*?\})$",
    ))
    .expect("bigcommerce-app pattern is valid")
});

/// level + content + free-form args
static WITH_ARGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^BigcommerceApp\.(?P<level>.*?): (?P<content>.*?) (?P<args>.+)$")
        .expect("bigcommerce-app args pattern is valid")
});

/// level + content
static BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^BigcommerceApp\.(?P<level>.*?): (?P<content>.+)$")
        .expect("bigcommerce-app bare pattern is valid")
});

static BARE_NULL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<sep>:\s*)NULL\b").expect("NULL pattern is valid"));

/// Parses the message of a `bigcommerce_app[pid]` line.
///
/// Once the strict pattern matched, a store context that fails to decode is
/// an error; looser patterns are not tried.
pub(crate) fn parse(pid: u32, message: &str) -> Result<Option<BigcommerceAppEvent>, ParseError> {
    if let Some(caps) = FULL.captures(message) {
        let store = decode_store_context(text(&caps, "store"))?;
        return Ok(Some(event(pid, message, &caps, store)));
    }

    let caps = match WITH_ARGS.captures(message) {
        Some(caps) => caps,
        None => match BARE.captures(message) {
            Some(caps) => caps,
            None => return Ok(None),
        },
    };

    Ok(Some(event(pid, message, &caps, StoreContext::default())))
}

fn event(pid: u32, message: &str, caps: &Captures<'_>, store: StoreContext) -> BigcommerceAppEvent {
    BigcommerceAppEvent {
        pid,
        level: owned(caps, "level"),
        content: owned(caps, "content"),
        args: owned(caps, "args"),
        store,
        message: message.to_string(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoreContextJson {
    #[serde(deserialize_with = "store_id")]
    store_id: u64,
    store_hash: Option<String>,
    #[serde(alias = "Domain")]
    domain: Option<String>,
}

fn decode_store_context(json: &str) -> Result<StoreContext, ParseError> {
    let normalized = BARE_NULL.replace_all(json, "${sep}0");

    let decoded: StoreContextJson =
        serde_json::from_str(&normalized).map_err(|source| ParseError::StoreContext {
            json: json.to_string(),
            source,
        })?;

    Ok(StoreContext {
        store_id: decoded.store_id,
        store_hash: decoded.store_hash.unwrap_or_default(),
        domain: decoded.domain.unwrap_or_default(),
    })
}

/// Store ids arrive as strings (`"1234"`), occasionally as numbers or `NULL`.
fn store_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawId::Number(id)) => Ok(id),
        Some(RawId::Text(id)) if id == "NULL" => Ok(0),
        Some(RawId::Text(id)) => id
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("store_id is not a number: '{id}'"))),
    }
}
