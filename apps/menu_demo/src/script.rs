//! Scripted user interactions replayed against an open menu.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Toggle { index: usize, checked: bool },
    Activate { index: usize },
    /// Apply completions until nothing is in flight.
    Wait,
    Close,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.trim().split(':');
        let verb = parts.next().unwrap_or_default();
        let step = match verb {
            "toggle" => {
                let index = parse_index(parts.next(), raw)?;
                let checked = match parts.next() {
                    Some("on") => true,
                    Some("off") => false,
                    other => bail!("toggle needs on|off, got {other:?} in '{raw}'"),
                };
                Step::Toggle { index, checked }
            }
            "activate" => Step::Activate {
                index: parse_index(parts.next(), raw)?,
            },
            "wait" => Step::Wait,
            "close" => Step::Close,
            other => bail!("unknown step '{other}'"),
        };

        if parts.next().is_some() {
            bail!("trailing arguments in step '{raw}'");
        }
        Ok(step)
    }
}

fn parse_index(part: Option<&str>, raw: &str) -> anyhow::Result<usize> {
    part.ok_or_else(|| anyhow!("missing entry index in '{raw}'"))?
        .parse()
        .with_context(|| format!("invalid entry index in '{raw}'"))
}

/// Parses a comma separated list such as `toggle:0:on,activate:2,wait`.
pub fn parse_script(raw: &str) -> anyhow::Result<Vec<Step>> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_script() {
        assert_eq!(
            parse_script("toggle:0:on, toggle:0:off,activate:3,wait,close").expect("script"),
            vec![
                Step::Toggle {
                    index: 0,
                    checked: true
                },
                Step::Toggle {
                    index: 0,
                    checked: false
                },
                Step::Activate { index: 3 },
                Step::Wait,
                Step::Close,
            ]
        );
    }

    #[test]
    fn empty_script_has_no_steps() {
        assert!(parse_script(" ").expect("script").is_empty());
    }

    #[test]
    fn rejects_malformed_steps() {
        assert!(parse_script("toggle:0").is_err());
        assert!(parse_script("toggle:x:on").is_err());
        assert!(parse_script("activate").is_err());
        assert!(parse_script("wait:now").is_err());
        assert!(parse_script("dance").is_err());
    }
}
