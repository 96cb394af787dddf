use htmlentity::entity::{CharacterSet, EncodeType, ICodedDataTrait};

/// Escapes `& < > " '` so `input` can be placed inside HTML text or a quoted attribute.
pub(crate) fn escape_html(input: &str) -> String {
    htmlentity::entity::encode(
        input.as_bytes(),
        &EncodeType::NamedOrDecimal,
        &CharacterSet::SpecialChars,
    )
    .to_string()
    .unwrap_or_default()
}

/// Appends `token` to `base` as the only query parameter.
pub(crate) fn link_with_token(base: &str, path: &str, token: &str) -> Result<String, serde_urlencoded::ser::Error> {
    let query = serde_urlencoded::to_string([("token", token)])?;

    Ok(format!("{}{}?{}", base.trim_end_matches('/'), path, query))
}
