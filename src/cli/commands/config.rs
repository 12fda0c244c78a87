use crate::cli::Output;
use crate::config::Config;
use anyhow::{Context, Result};

pub fn path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

pub fn show() -> Result<()> {
    let config = Config::load()?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn get(key: &str) -> Result<()> {
    let config = Config::load()?;
    let config_toml = toml::to_string_pretty(&config)?;
    let value = toml::from_str::<toml::Value>(&config_toml)?;

    // Nested keys use dots (e.g., "writer.sync_data")
    let mut current = &value;
    for k in key.split('.') {
        match current.get(k) {
            Some(v) => current = v,
            None => {
                Output::error(&format!("Key '{}' not found in config", key));
                return Ok(());
            }
        }
    }

    match current {
        toml::Value::String(s) => println!("{}", s),
        toml::Value::Integer(i) => println!("{}", i),
        toml::Value::Boolean(b) => println!("{}", b),
        toml::Value::Table(_) => println!("{}", toml::to_string_pretty(current)?),
        _ => println!("{}", current),
    }
    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let config = Config::load()?;
    let config_toml = toml::to_string_pretty(&config)?;
    let mut toml_value = toml::from_str::<toml::Value>(&config_toml)?;

    let keys: Vec<&str> = key.split('.').collect();
    let (last_key, parents) = match keys.split_last() {
        Some(split) => split,
        None => {
            Output::error("Empty config key");
            return Ok(());
        }
    };

    let mut current = &mut toml_value;
    for k in parents {
        match current.get_mut(*k) {
            Some(v) => current = v,
            None => {
                Output::error(&format!("Key path '{}' not found in config", key));
                return Ok(());
            }
        }
    }

    let table = match current.as_table_mut() {
        Some(t) => t,
        None => {
            Output::error(&format!("Cannot set value at '{}'", key));
            return Ok(());
        }
    };

    let new_value = if value == "true" {
        toml::Value::Boolean(true)
    } else if value == "false" {
        toml::Value::Boolean(false)
    } else if let Ok(i) = value.parse::<i64>() {
        toml::Value::Integer(i)
    } else {
        toml::Value::String(value.to_string())
    };
    table.insert(last_key.to_string(), new_value);

    let config_toml = toml::to_string_pretty(&toml_value)?;
    let config: Config = toml::from_str(&config_toml)
        .with_context(|| format!("Invalid value for '{key}'"))?;
    config.validate()?;
    config.save()?;

    Output::success(&format!("Set {} = {}", key, value));
    Ok(())
}
