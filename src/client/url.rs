// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Target URL resolution
//!
//! Joins the call URL with the call or client base URL and merges query
//! parameters from the URL itself, the call and the client, in that order.

use regex::Regex;
use url::Url;

use super::config::{ClientConfig, Parameters};
use super::options::RequestOptions;
use super::resolve::OptionResolver;
use crate::error::{Error, Result};

lazy_static::lazy_static! {
    static ref ABSOLUTE_URL: Regex = Regex::new(r"^https?://.+").expect("valid absolute URL pattern");
}

/// Check whether a URL starts with an `http://` or `https://` scheme
pub fn is_absolute(url: &str) -> bool {
    ABSOLUTE_URL.is_match(url)
}

/// Resolves the final request URL for one call
pub struct UrlBuilder<'a> {
    client: &'a ClientConfig,
    call: &'a RequestOptions,
}

impl<'a> UrlBuilder<'a> {
    pub fn new(client: &'a ClientConfig, call: &'a RequestOptions) -> Self {
        Self { client, call }
    }

    /// Resolve `target` into an absolute URL with the merged query string
    pub fn build(&self, target: &str) -> Result<Url> {
        let (base, extra_path) = self.split_target(target)?;
        let mut url = Url::parse(&base)?;

        if !extra_path.is_empty() {
            let joined = join_path(url.path(), extra_path);
            url.set_path(&joined);
        }

        let parameters = self.merge_parameters(&url);
        let query = self.serialize(&parameters);
        url.set_query(if query.is_empty() { None } else { Some(&query) });

        Ok(url)
    }

    /// Split the call URL into a base URL and a path to append to it
    pub fn split_target<'t>(&self, target: &'t str) -> Result<(String, &'t str)> {
        if !target.is_empty() && is_absolute(target) {
            return Ok((target.to_string(), ""));
        }

        let base = [&self.call.base_url, &self.client.base_url]
            .into_iter()
            .flatten()
            .find(|b| !b.is_empty());

        let (base, extra_path) = match base {
            Some(base) => (base.clone(), target),
            None => (target.to_string(), ""),
        };

        if base.is_empty() {
            return Err(Error::NoUrl);
        }

        if is_absolute(&base) {
            Ok((base, extra_path))
        } else {
            Ok((format!("https://{}", base), extra_path))
        }
    }

    /// Query parameters from the URL, then the call, then unseen client keys
    pub fn merge_parameters(&self, url: &Url) -> Parameters {
        let mut merged = Parameters::new();
        for (key, value) in url.query_pairs() {
            merged
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }

        for (key, values) in &self.call.parameters {
            merged
                .entry(key.clone())
                .or_default()
                .extend(values.iter().cloned());
        }

        for (key, values) in &self.client.parameters {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), values.clone());
            }
        }

        merged
    }

    fn serialize(&self, parameters: &Parameters) -> String {
        match OptionResolver::new(self.client, self.call).parameters_serializer() {
            Some(serializer) => serializer.serialize(parameters),
            None => encode_parameters(parameters),
        }
    }
}

/// Default query encoder: `key=value` pairs, keys sorted, repeated keys
/// emitted once per value, both sides form-URL-escaped
pub fn encode_parameters(parameters: &Parameters) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, values) in parameters {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

/// Join two URL paths and clean `.`, `..` and duplicate separators
fn join_path(base: &str, extra: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(extra.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}
