//! Translation file input definitions

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use super::{
    LoadError,
    TsDocument,
    parse_ts_bytes,
};

/// RFC 5646 language codes, plus the regional variants shipped as Qt
/// translation files.
/// Based on <http://tools.ietf.org/html/rfc5646>
static LANGUAGE_CODES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    "af af-ZA ar ar-AE ar-BH ar-DZ ar-EG ar-IQ ar-JO ar-KW ar-LB ar-LY ar-MA ar-OM ar-QA \
     ar-SA ar-SY ar-TN ar-YE az az-AZ az-Cyrl-AZ be be-BY bg bg-BG bs-BA ca ca-ES ca-VA \
     cs cs-CZ cy cy-GB da da-DK de de-AT de-CH de-DE de-LI de-LU dv dv-MV el el-GR en \
     en-AU en-BZ en-CA en-CB en-GB en-IE en-JM en-NZ en-PH en-TT en-US en-ZA en-ZW eo es \
     es-AR es-BO es-CL es-CO es-CR es-DO es-EC es-ES es-GT es-HN es-MX es-NI es-PA es-PE \
     es-PR es-PY es-SV es-UY es-VE et et-EE eu eu-ES fa fa-IR fi fi-FI fo fo-FO fr fr-BE \
     fr-CA fr-CH fr-FR fr-LU fr-MC gl gl-ES gu gu-IN he he-IL hi hi-IN hr hr-BA hr-HR hu \
     hu-HU hy hy-AM id id-ID is is-IS it it-CH it-IT ja ja-JP ka ka-GE kk kk-KZ kn kn-IN \
     ko ko-KR kok kok-IN ky ky-KG lt lt-LT lv lv-LV mi mi-NZ mk mk-MK mn mn-MN mr mr-IN \
     ms ms-BN ms-MY mt mt-MT nb nb-NO nl nl-BE nl-NL nn-NO ns ns-ZA pa pa-IN pl pl-PL ps \
     ps-AR pt pt-BR pt-PT qu qu-BO qu-EC qu-PE ro ro-RO ru ru-RU sa sa-IN se se-FI se-NO \
     se-SE sk sk-SK sl sl-SI sq sq-AL sr sr-BA sr-Cyrl-BA sr-SP sr-Cyrl-SP sr-Latn sv \
     sv-FI sv-SE sw sw-KE syr syr-SY ta ta-IN te te-IN th th-TH tl tl-PH tn tn-ZA tr tr-TR \
     tt tt-RU uk uk-UA ur ur-PK uz uz-UZ uz-Cyrl-UZ vi vi-VN xh xh-ZA zh zh-CN zh-HK \
     zh-MO zh-SG zh-TW zu zu-ZA"
        .split_whitespace()
        .map(normalize_language_code)
        .collect()
});

/// Normalize language code (lowercase and replace - with _)
#[must_use]
pub fn normalize_language_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// Whether `code` is a known language code, in any case or separator style.
fn is_language_code(code: &str) -> bool {
    !code.is_empty() && LANGUAGE_CODES.contains(&normalize_language_code(code))
}

/// Detect language from a translation file name heuristically
///
/// The file stem is split on `_` and searched backwards for the start of a
/// language code; the code keeps any region/script suffix that follows it.
/// When the stem has no code, path components are searched backwards.
///
/// # Examples
/// - `nls/VirtualBox_pt.ts` → `pt`
/// - `nls/VirtualBox_pt_BR.ts` → `pt_BR`
/// - `nls/VirtualBox_sr_Cyrl_BA.ts` → `sr_Cyrl_BA`
/// - `translations/ja/app.ts` → `ja`
///
/// # Returns
/// Detected language code, or `None`
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> Option<String> {
    if let Some(stem) = file_path.file_stem().map(|stem| stem.to_string_lossy()) {
        let segments: Vec<&str> = stem.split('_').collect();
        for start in (0..segments.len()).rev() {
            let Some(suffix) = segments.get(start..) else {
                continue;
            };
            let candidate = suffix.join("_");
            if is_language_code(&candidate) || suffix.first().is_some_and(|s| is_language_code(s)) {
                return Some(candidate);
            }
        }
    }

    let parent = file_path.parent()?.to_string_lossy();
    parent
        .split(['/', '\\', '.'])
        .rev()
        .find(|part| is_language_code(part))
        .map(str::to_string)
}

/// Reads and parses a translation file.
///
/// The document's `language` attribute wins; when it is missing the
/// language detected from the file name is used instead.
///
/// # Errors
/// Returns error if the file cannot be read or is not a valid `.ts` document.
pub fn load_ts_file(file_path: &Path) -> Result<TsDocument, LoadError> {
    tracing::debug!(path = %file_path.display(), "Loading translation file");

    let bytes = std::fs::read(file_path)?;
    let mut document = parse_ts_bytes(&bytes)?;
    fill_language(&mut document, file_path);

    Ok(document)
}

/// Fills a missing document language from the file name.
pub(crate) fn fill_language(document: &mut TsDocument, file_path: &Path) {
    if document.language.as_deref().is_none_or(str::is_empty) {
        document.language = detect_language_from_path(file_path);
    }
}
