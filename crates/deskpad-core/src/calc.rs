use anyhow::bail;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl Op {
    pub fn parse(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            '%' => Some(Self::Remainder),
            _ => None,
        }
    }

    // A zero divisor is defined to give 0, not infinity. The remainder has
    // no such case and follows plain float semantics.
    pub fn apply(self, prev: f64, curr: f64) -> f64 {
        match self {
            Self::Add => prev + curr,
            Self::Subtract => prev - curr,
            Self::Multiply => prev * curr,
            Self::Divide => {
                if curr != 0.0 {
                    prev / curr
                } else {
                    0.0
                }
            }
            Self::Remainder => prev % curr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Operator(Op),
    Equals,
    ClearEntry,
    ClearAll,
}

pub fn parse_keys(tokens: &[String]) -> anyhow::Result<Vec<Key>> {
    let mut keys = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case("ac") {
            keys.push(Key::ClearAll);
            continue;
        }
        if token.eq_ignore_ascii_case("ce") || token.eq_ignore_ascii_case("c") {
            keys.push(Key::ClearEntry);
            continue;
        }
        for ch in token.chars() {
            if ch.is_whitespace() {
                continue;
            }
            if ch.is_ascii_digit() {
                keys.push(Key::Digit(ch));
            } else if ch == '=' {
                keys.push(Key::Equals);
            } else if let Some(op) = Op::parse(ch) {
                keys.push(Key::Operator(op));
            } else {
                bail!("unrecognized calculator key: {ch}");
            }
        }
    }
    Ok(keys)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    current_value: String,
    previous_value: Option<f64>,
    operator: Option<Op>,
    waiting_for_value: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            current_value: "0".to_string(),
            previous_value: None,
            operator: None,
            waiting_for_value: false,
        }
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &str {
        &self.current_value
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(digit) => self.input_digit(digit),
            Key::Operator(op) => self.input_operator(op),
            Key::Equals => self.evaluate(),
            Key::ClearEntry => self.clear_entry(),
            Key::ClearAll => self.clear_all(),
        }
        trace!(?key, display = %self.current_value, "calculator key");
    }

    pub fn input_digit(&mut self, digit: char) {
        if self.waiting_for_value {
            self.current_value = digit.to_string();
            self.waiting_for_value = false;
        } else if self.current_value == "0" {
            self.current_value = digit.to_string();
        } else {
            self.current_value.push(digit);
        }
    }

    pub fn input_operator(&mut self, op: Op) {
        let value = self.parse_display();

        match (self.previous_value, self.operator) {
            (None, _) => self.previous_value = Some(value),
            (Some(previous), Some(pending)) => {
                let result = pending.apply(previous, value);
                self.current_value = result.to_string();
                self.previous_value = Some(result);
            }
            (Some(_), None) => {}
        }

        self.waiting_for_value = true;
        self.operator = Some(op);
    }

    pub fn evaluate(&mut self) {
        if let (Some(previous), Some(pending)) = (self.previous_value, self.operator) {
            let result = pending.apply(previous, self.parse_display());
            self.current_value = result.to_string();
            self.previous_value = None;
            self.operator = None;
            self.waiting_for_value = true;
        }
    }

    pub fn clear_entry(&mut self) {
        self.current_value = "0".to_string();
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    fn parse_display(&self) -> f64 {
        self.current_value.parse().unwrap_or(f64::NAN)
    }
}
