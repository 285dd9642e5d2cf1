// Copyright 2024-2025 Irreducible Inc.

use std::{env, fmt::Display, str::FromStr};

use crate::errors::err_msg;

pub fn get_env_var<T: FromStr + Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            err_msg!(
                "invalid '{name}' environment value: {val}, using the default value '{default}'"
            );

            default
        }),
        Err(_) => default,
    }
}

pub fn get_bool_env_var(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(val) => match parse_bool(&val) {
            Some(value) => value,
            None => {
                err_msg!("invalid '{name}' environment value: {val}, using the default value '{default}'");

                default
            }
        },
        Err(_) => default,
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_spellings() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool(" 1 "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("No"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn missing_var_uses_default() {
        assert_eq!(
            get_env_var("THREAD_TIMING_SURELY_UNSET_VAR", "x".to_string()),
            "x"
        );
        assert!(get_bool_env_var("THREAD_TIMING_SURELY_UNSET_VAR", true));
    }
}
