use std::env;
use std::error::Error;

use lenient::get_matcher;
use serde_json::json;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: lenient <locale> <text> <key> [extra-rules]";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (locale, text, key) = match args.as_slice() {
        [locale, text, key] | [locale, text, key, _] => (locale, text, key),
        _ => return Err(USAGE.into()),
    };
    let extra_rules = args.get(3).map(String::as_str);

    let matcher = get_matcher(locale, extra_rules);
    let found = matcher.find_text(text, key, 0);
    let remainder = found.map_or(text.as_str(), |m| &text[m.end()..]);

    let report = json!({
        "locale": matcher.locale_key().locale,
        "degraded": matcher.degraded_reason(),
        "match": found.map(|m| json!({
            "start": m.start,
            "len": m.len,
            "text": &text[m.range()],
        })),
        "remainder_ignorable": matcher.all_ignorable(remainder),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
