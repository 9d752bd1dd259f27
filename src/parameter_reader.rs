use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::ParameterError;

/// `name: value` pairs read from a parameter file.
#[derive(Debug, Clone)]
pub struct Parameters
{
    values: HashMap<&'static str, String>,
}

// `#` opens a comment at the start of a line or after whitespace, so `a#b.csv` stays intact.
fn strip_comment(line: &str) -> &str
{
    let mut previous = None;
    for (position, c) in line.char_indices()
    {
        if c == '#' && previous.map_or(true, char::is_whitespace)
        {
            return &line[..position];
        }
        previous = Some(c);
    }
    line
}

fn build_new_map(names: &[&'static str], content: &str) -> Result<HashMap<&'static str, String>, ParameterError>
{
    let mut parameter_map: HashMap<&'static str, String> = HashMap::new();
    for (line_number, line) in content.lines().enumerate()
    {
        let line = strip_comment(line).trim();
        if line.is_empty()
        {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else
        {
            return Err(ParameterError::BadDelimiter { line: line_number + 1 });
        };
        if let Some(&name) = names.iter().find(|&&name| name == key.trim())
        {
            parameter_map.insert(name, value.trim().to_owned());
        }
    }
    for &name in names
    {
        if !parameter_map.contains_key(name)
        {
            return Err(ParameterError::MissingParameter(name));
        }
    }
    Ok(parameter_map)
}

impl Parameters
{
    pub fn parse(names: &[&'static str], content: &str) -> Result<Self, ParameterError>
    {
        let values = build_new_map(names, content)?;
        Ok(Self { values })
    }
    pub fn read(file_name: &Path, names: &[&'static str]) -> Result<Self, ParameterError>
    {
        let content = fs::read_to_string(file_name)?;
        Self::parse(names, &content)
    }
    pub fn raw(&self, name: &'static str) -> Result<&str, ParameterError>
    {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or(ParameterError::MissingParameter(name))
    }
    pub fn get<T: FromStr>(&self, name: &'static str) -> Result<T, ParameterError>
    {
        let value = self.raw(name)?;
        value.parse().map_err(|_| ParameterError::Parse { name, value: value.to_owned() })
    }
    /// Comma separated list, e.g. `side_lengths: 10, 20, 50`.
    pub fn get_list<T: FromStr>(&self, name: &'static str) -> Result<Vec<T>, ParameterError>
    {
        self.raw(name)?
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| item.parse().map_err(|_| ParameterError::Parse { name, value: item.to_owned() }))
            .collect()
    }
}
