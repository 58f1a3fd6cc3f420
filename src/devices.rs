//! Peripheral devices the kernel routes commands to.
//!
//! Devices translate loose command payloads into typed agent operations.
//! The kernel owns one instance of each and hands it the agent per call;
//! devices keep no state of their own.

use serde_json::{json, Value};

use vivarium_core::{Agent, Channel};

use crate::kernel::{KernelError, Result};

/// Response payload produced by a device endpoint.
#[derive(Debug, Clone)]
pub struct DeviceResponse {
    pub payload: Value,
}

pub trait Device {
    fn name(&self) -> &'static str;
    fn handle(&self, agent: &mut Agent, endpoint: &str, payload: &Value) -> Result<DeviceResponse>;
}

/// The feeding and teaching tablet.
pub struct TabletDevice;

impl Device for TabletDevice {
    fn name(&self) -> &'static str {
        "tablet"
    }

    fn handle(&self, agent: &mut Agent, endpoint: &str, payload: &Value) -> Result<DeviceResponse> {
        match endpoint {
            "feed" => {
                let number = string_field(payload, "number");
                if number.is_empty() {
                    return Err(KernelError::Device(
                        "tablet.feed requires a number".to_string(),
                    ));
                }
                let command = analyse_feed_number(&number)?;
                let outcome = agent.feed(command.channel, command.amount, &command.descriptor)?;
                let mut response = serde_json::to_value(&outcome)?;
                response["number"] = Value::String(number);
                Ok(DeviceResponse { payload: response })
            }
            "teach" => {
                let token = string_field(payload, "token");
                if token.is_empty() {
                    return Err(KernelError::Device(
                        "tablet.teach requires a token".to_string(),
                    ));
                }
                let channel = channel_from_token(&token);
                let outcome = agent.teach(&token, channel);
                Ok(DeviceResponse {
                    payload: serde_json::to_value(&outcome)?,
                })
            }
            other => Err(KernelError::Device(format!(
                "unknown tablet endpoint: {other}"
            ))),
        }
    }
}

/// The concept uplink.
pub struct NetDevice;

impl Device for NetDevice {
    fn name(&self) -> &'static str {
        "net"
    }

    fn handle(&self, agent: &mut Agent, endpoint: &str, payload: &Value) -> Result<DeviceResponse> {
        if endpoint != "add" {
            return Err(KernelError::Device(format!(
                "unknown net endpoint: {endpoint}"
            )));
        }
        let text = string_field(payload, "text");
        if text.is_empty() {
            return Err(KernelError::Device("net.add requires text".to_string()));
        }
        let tags: Vec<String> = match payload.get("tags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect(),
            _ => Vec::new(),
        };
        let outcome = agent.add_concept(&text, &tags);
        let mut response = serde_json::to_value(&outcome)?;
        response["text"] = json!(text);
        response["tags"] = json!(tags);
        Ok(DeviceResponse { payload: response })
    }
}

struct FeedCommand {
    descriptor: String,
    channel: Channel,
    amount: f64,
}

/// Reads the numeral the creature is being fed: palindromes are special,
/// parity and divisibility pick the channel, digit count sets the amount.
fn analyse_feed_number(number: &str) -> Result<FeedCommand> {
    let cleaned: String = number.chars().filter(|&c| c != '_').collect();
    let numeric: i64 = cleaned
        .parse()
        .map_err(|_| KernelError::Device("feed number must be an integer".to_string()))?;

    let reversed: String = cleaned.chars().rev().collect();
    let descriptor = if cleaned == reversed {
        "palindrome"
    } else {
        "sequence"
    };
    let channel = if descriptor == "palindrome" {
        Channel::Mirror
    } else if numeric == 0 {
        Channel::Flux
    } else if numeric % 2 == 0 {
        Channel::Mirror
    } else if numeric % 5 == 0 || numeric % 3 == 0 {
        Channel::Flux
    } else {
        Channel::Shard
    };

    let mut amount = (cleaned.len() as f64 / 2.5).clamp(0.2, 3.0);
    if descriptor == "palindrome" {
        amount *= 1.2;
    }
    Ok(FeedCommand {
        descriptor: descriptor.to_string(),
        channel,
        amount,
    })
}

fn channel_from_token(token: &str) -> Channel {
    let lower = token.to_lowercase();
    let reversed: String = lower.chars().rev().collect();
    if lower == reversed {
        return Channel::Mirror;
    }
    if lower.chars().any(|c| matches!(c, 'x' | 'z' | 'k')) {
        return Channel::Shard;
    }
    if lower.chars().any(|c| matches!(c, 's' | 'w' | '~')) {
        return Channel::Flux;
    }
    // fallback on vowel/consonant balance
    let vowels = lower.chars().filter(|c| "aeiou".contains(*c)).count();
    let consonants = lower.chars().filter(|c| c.is_alphabetic()).count() - vowels;
    if vowels >= consonants {
        Channel::Mirror
    } else {
        Channel::Shard
    }
}

fn string_field(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}
