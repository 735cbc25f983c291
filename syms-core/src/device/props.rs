// syms-core/src/device/props.rs
use std::sync::LazyLock;

use regex::Regex;
use syms_common::model::BuildParameters;

const FIRST_PARTY_BRANDS: &[&str] = &["google"];
const KERNEL_NAME_SUFFIXES: &[&str] = &["_kasan", "_hwasan"];

static KERNEL_RELEASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-g(?P<hash>[0-9a-f]{7,40})(?:.*?-ab(?P<bid>\d+))?").expect("valid regex")
});

/// Source hash and build id of the running kernel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelIdentity {
    pub hash: Option<String>,
    pub build_id: Option<String>,
}

/// Parses `ro.build.fingerprint`:
/// `brand/product/device:release/id/incremental:type/tags`.
pub fn parse_build_fingerprint(fingerprint: &str) -> Option<BuildParameters> {
    let mut sections = fingerprint.trim().split(':');
    let names = sections.next()?;
    let versions = sections.next()?;
    let kind = sections.next()?;

    let target = names.split('/').nth(1)?;
    let build_id = versions.split('/').nth(2)?;
    let build_type = kind.split('/').next()?;

    let params = BuildParameters::new(build_id, target, build_type);
    params.is_complete().then_some(params)
}

/// Parses a kernel release string such as `4.19.110-g3b6bd1b2d0bc-ab6386592`.
pub fn parse_kernel_release(release: &str) -> KernelIdentity {
    match KERNEL_RELEASE_RE.captures(release.trim()) {
        Some(caps) => KernelIdentity {
            hash: caps.name("hash").map(|m| m.as_str().to_string()),
            build_id: caps.name("bid").map(|m| m.as_str().to_string()),
        },
        None => KernelIdentity::default(),
    }
}

pub fn is_first_party_brand(brand: &str) -> bool {
    let brand = brand.trim();
    FIRST_PARTY_BRANDS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(brand))
}

/// Kernel build target for a product name; sanitizer variants share the
/// plain product's kernel target.
pub fn kernel_target_from_product(product: &str) -> Option<String> {
    let mut name = product.trim();
    for suffix in KERNEL_NAME_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped;
        }
    }
    (!name.is_empty()).then(|| name.to_string())
}
