//! Request envelope construction.
//!
//! # Layout
//! ```text
//! <PWBRequest>
//!   <transactionName/>
//!   <header><application/><requestTime/></header>
//!   <identityInfo><corpCode/><userName/></identityInfo>
//!   ...business parameters...
//! </PWBRequest>
//! ```
//!
//! Written compactly with no declaration. Every leaf is a CDATA section;
//! element names are taken from parameter keys as-is.

use chrono::{Local, NaiveDate};

use crate::config::schema::Credentials;
use crate::protocol::params::{ParamValue, Params};

/// Root element of every request document.
pub const ROOT_ELEMENT: &str = "PWBRequest";

/// Build the envelope dated with today's local date.
pub fn build_envelope(api_name: &str, params: &Params, credentials: &Credentials) -> String {
    build_envelope_on(api_name, params, credentials, Local::now().date_naive())
}

/// Build the envelope with an explicit request date.
pub fn build_envelope_on(
    api_name: &str,
    params: &Params,
    credentials: &Credentials,
    date: NaiveDate,
) -> String {
    let mut xml = String::with_capacity(256);

    open(&mut xml, ROOT_ELEMENT);
    write_leaf(&mut xml, "transactionName", api_name);

    open(&mut xml, "header");
    write_leaf(&mut xml, "application", &credentials.application);
    write_leaf(&mut xml, "requestTime", &date.format("%Y-%m-%d").to_string());
    close(&mut xml, "header");

    open(&mut xml, "identityInfo");
    write_leaf(&mut xml, "corpCode", &credentials.corp_code);
    write_leaf(&mut xml, "userName", &credentials.user_name);
    close(&mut xml, "identityInfo");

    write_params(&mut xml, params);
    close(&mut xml, ROOT_ELEMENT);

    xml
}

fn write_params(xml: &mut String, params: &Params) {
    for (name, value) in params.iter() {
        match value {
            ParamValue::Text(text) => write_leaf(xml, name, text),
            ParamValue::Nested(children) => {
                open(xml, name);
                write_params(xml, children);
                close(xml, name);
            }
        }
    }
}

fn write_leaf(xml: &mut String, name: &str, value: &str) {
    open(xml, name);
    write_cdata(xml, value);
    close(xml, name);
}

// A literal "]]>" would end the section early, so it is split across two.
fn write_cdata(xml: &mut String, value: &str) {
    xml.push_str("<![CDATA[");
    xml.push_str(&value.replace("]]>", "]]]]><![CDATA[>"));
    xml.push_str("]]>");
}

fn open(xml: &mut String, name: &str) {
    xml.push('<');
    xml.push_str(name);
    xml.push('>');
}

fn close(xml: &mut String, name: &str) {
    xml.push_str("</");
    xml.push_str(name);
    xml.push('>');
}
