//! Schema-specific component extraction.
//!
//! Both extractors produce the same normalized record shape and follow the
//! same tolerance policy: a malformed field inside a recognized document
//! degrades to an absent value, never to an error. Only whole-document
//! problems (unrecognized format, nothing extractable) are surfaced, and
//! that decision belongs to the ingestion pipeline, not this module.

use crate::models::sbom::SbomFormat;
use crate::sbom::detect::detect_format;
use serde_json::{Map, Value};

/// Name applied when a source element carries no usable `name` field.
const UNKNOWN_NAME: &str = "unknown";

/// One normalized component record, prior to persistence.
///
/// `metadata` is the original source element, carried verbatim for audit.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedComponent {
    pub name: String,
    pub version: Option<String>,
    pub purl: Option<String>,
    pub group: Option<String>,
    pub component_type: Option<String>,
    pub supplier: Option<String>,
    pub license: Option<String>,
    pub scope: Option<String>,
    pub metadata: Value,
}

/// Outcome of detection plus extraction over one document.
#[derive(Clone, Debug)]
pub struct ParsedSbom {
    pub format: SbomFormat,
    pub spec_version: Option<String>,
    pub components: Vec<NormalizedComponent>,
}

/// Detect the document schema and extract its normalized components.
///
/// Pure function of the input: no I/O, deterministic, and components keep
/// the relative order of the source array. Unrecognized documents come
/// back as `SbomFormat::Other` with zero components.
pub fn parse_sbom(doc: &Value) -> ParsedSbom {
    match detect_format(doc) {
        SbomFormat::Cyclonedx => ParsedSbom {
            format: SbomFormat::Cyclonedx,
            spec_version: str_field(doc, "specVersion"),
            components: object_elements(doc, "components")
                .map(cyclonedx_component)
                .collect(),
        },
        SbomFormat::Spdx => ParsedSbom {
            format: SbomFormat::Spdx,
            spec_version: str_field(doc, "spdxVersion"),
            components: object_elements(doc, "packages")
                .map(spdx_package)
                .collect(),
        },
        SbomFormat::Other => ParsedSbom {
            format: SbomFormat::Other,
            spec_version: None,
            components: Vec::new(),
        },
    }
}

/// String-typed field accessor; any other type reads as absent.
fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Iterate the object-shaped elements of a top-level array field.
///
/// An absent or non-array field yields nothing; non-object elements are
/// skipped without emitting a placeholder.
fn object_elements<'a>(
    doc: &'a Value,
    key: &str,
) -> impl Iterator<Item = (&'a Map<String, Value>, &'a Value)> {
    doc.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(|element| element.as_object().map(|obj| (obj, element)))
}

/// Normalize one CycloneDX `components[]` element.
fn cyclonedx_component((obj, element): (&Map<String, Value>, &Value)) -> NormalizedComponent {
    let supplier = obj
        .get("supplier")
        .filter(|v| v.is_object())
        .and_then(|supplier| str_field(supplier, "name"));

    // licenses[0].license.(id|name)
    let license = obj
        .get("licenses")
        .and_then(Value::as_array)
        .and_then(|licenses| licenses.first())
        .filter(|entry| entry.is_object())
        .and_then(|entry| entry.get("license"))
        .filter(|v| v.is_object())
        .and_then(|lic| str_field(lic, "id").or_else(|| str_field(lic, "name")));

    NormalizedComponent {
        name: str_field(element, "name").unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        version: str_field(element, "version"),
        purl: str_field(element, "purl"),
        group: str_field(element, "group"),
        component_type: str_field(element, "type"),
        supplier,
        license,
        // CycloneDX's scope concept is intentionally not modeled.
        scope: None,
        metadata: element.clone(),
    }
}

/// Normalize one SPDX `packages[]` element.
fn spdx_package((obj, element): (&Map<String, Value>, &Value)) -> NormalizedComponent {
    // licenseConcluded strictly takes precedence over licenseDeclared.
    let license =
        str_field(element, "licenseConcluded").or_else(|| str_field(element, "licenseDeclared"));

    NormalizedComponent {
        name: str_field(element, "name").unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        version: str_field(element, "versionInfo"),
        purl: spdx_purl(obj),
        group: None,
        component_type: None,
        supplier: str_field(element, "supplier"),
        license,
        scope: None,
        metadata: element.clone(),
    }
}

/// Scan `externalRefs` in array order for the first entry whose
/// `referenceType` contains "purl" case-insensitively; its
/// `referenceLocator` is the package's purl.
fn spdx_purl(obj: &Map<String, Value>) -> Option<String> {
    obj.get("externalRefs")
        .and_then(Value::as_array)?
        .iter()
        .find_map(|entry| {
            let reference_type = entry.get("referenceType").and_then(Value::as_str)?;
            if !reference_type.to_lowercase().contains("purl") {
                return None;
            }
            str_field(entry, "referenceLocator")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cyclonedx_missing_components_array_yields_empty() {
        let parsed = parse_sbom(&json!({ "bomFormat": "CycloneDX" }));
        assert_eq!(parsed.format, SbomFormat::Cyclonedx);
        assert!(parsed.components.is_empty());
    }

    #[test]
    fn cyclonedx_non_array_components_yields_empty() {
        let parsed = parse_sbom(&json!({ "bomFormat": "CycloneDX", "components": "nope" }));
        assert!(parsed.components.is_empty());
    }

    #[test]
    fn cyclonedx_skips_non_object_elements_preserving_order() {
        let doc = json!({
            "bomFormat": "CycloneDX",
            "components": [
                { "name": "alpha" },
                42,
                "stray",
                { "name": "beta" },
                null,
                { "name": "gamma" }
            ]
        });
        let parsed = parse_sbom(&doc);
        let names: Vec<&str> = parsed.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn cyclonedx_defaults_missing_name_to_unknown() {
        let doc = json!({
            "bomFormat": "CycloneDX",
            "components": [{ "version": "1.0.0" }, { "name": 17 }]
        });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.components[0].name, "unknown");
        assert_eq!(parsed.components[1].name, "unknown");
    }

    #[test]
    fn cyclonedx_copies_string_fields_and_drops_mistyped_ones() {
        let doc = json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.5",
            "components": [{
                "name": "serde",
                "version": "1.0.200",
                "purl": "pkg:cargo/serde@1.0.200",
                "group": "serde-rs",
                "type": "library"
            }, {
                "name": "odd",
                "version": 2,
                "purl": { "oops": true },
                "group": ["g"],
                "type": null
            }]
        });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.spec_version.as_deref(), Some("1.5"));

        let good = &parsed.components[0];
        assert_eq!(good.version.as_deref(), Some("1.0.200"));
        assert_eq!(good.purl.as_deref(), Some("pkg:cargo/serde@1.0.200"));
        assert_eq!(good.group.as_deref(), Some("serde-rs"));
        assert_eq!(good.component_type.as_deref(), Some("library"));
        assert_eq!(good.scope, None);

        let odd = &parsed.components[1];
        assert_eq!(odd.version, None);
        assert_eq!(odd.purl, None);
        assert_eq!(odd.group, None);
        assert_eq!(odd.component_type, None);
    }

    #[test]
    fn cyclonedx_supplier_reads_nested_name() {
        let doc = json!({
            "bomFormat": "CycloneDX",
            "components": [
                { "name": "a", "supplier": { "name": "Acme Corp" } },
                { "name": "b", "supplier": "flat-string" },
                { "name": "c", "supplier": { "url": ["https://acme.example"] } }
            ]
        });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.components[0].supplier.as_deref(), Some("Acme Corp"));
        assert_eq!(parsed.components[1].supplier, None);
        assert_eq!(parsed.components[2].supplier, None);
    }

    #[test]
    fn cyclonedx_license_prefers_id_then_name_from_first_entry() {
        let doc = json!({
            "bomFormat": "CycloneDX",
            "components": [
                { "name": "a", "licenses": [{ "license": { "id": "MIT", "name": "MIT License" } }] },
                { "name": "b", "licenses": [{ "license": { "name": "Custom" } }] },
                { "name": "c", "licenses": [{ "license": { "id": "MIT" } }, { "license": { "id": "Apache-2.0" } }] },
                { "name": "d", "licenses": ["MIT"] },
                { "name": "e", "licenses": [] },
                { "name": "f" }
            ]
        });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.components[0].license.as_deref(), Some("MIT"));
        assert_eq!(parsed.components[1].license.as_deref(), Some("Custom"));
        assert_eq!(parsed.components[2].license.as_deref(), Some("MIT"));
        assert_eq!(parsed.components[3].license, None);
        assert_eq!(parsed.components[4].license, None);
        assert_eq!(parsed.components[5].license, None);
    }

    #[test]
    fn cyclonedx_metadata_is_the_element_verbatim() {
        let element = json!({ "name": "a", "extra": { "deeply": ["nested", 1] } });
        let doc = json!({ "bomFormat": "CycloneDX", "components": [element] });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.components[0].metadata, element);
    }

    #[test]
    fn spdx_basic_fields() {
        let doc = json!({
            "spdxVersion": "SPDX-2.3",
            "packages": [{
                "name": "openssl",
                "versionInfo": "3.0.13",
                "supplier": "Organization: OpenSSL Foundation"
            }]
        });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.format, SbomFormat::Spdx);
        assert_eq!(parsed.spec_version.as_deref(), Some("SPDX-2.3"));

        let pkg = &parsed.components[0];
        assert_eq!(pkg.name, "openssl");
        assert_eq!(pkg.version.as_deref(), Some("3.0.13"));
        assert_eq!(
            pkg.supplier.as_deref(),
            Some("Organization: OpenSSL Foundation")
        );
        assert_eq!(pkg.group, None);
        assert_eq!(pkg.component_type, None);
        assert_eq!(pkg.scope, None);
    }

    #[test]
    fn spdx_missing_name_defaults_to_unknown() {
        let doc = json!({ "SPDXID": "SPDXRef-DOCUMENT", "packages": [{ "versionInfo": "1.2" }] });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.components[0].name, "unknown");
    }

    #[test]
    fn spdx_license_concluded_beats_declared() {
        let doc = json!({
            "spdxVersion": "SPDX-2.3",
            "packages": [
                { "name": "a", "licenseConcluded": "MIT", "licenseDeclared": "Apache-2.0" },
                { "name": "b", "licenseDeclared": "Apache-2.0" },
                { "name": "c", "licenseConcluded": 42, "licenseDeclared": "GPL-3.0-only" },
                { "name": "d" }
            ]
        });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.components[0].license.as_deref(), Some("MIT"));
        assert_eq!(parsed.components[1].license.as_deref(), Some("Apache-2.0"));
        assert_eq!(parsed.components[2].license.as_deref(), Some("GPL-3.0-only"));
        assert_eq!(parsed.components[3].license, None);
    }

    #[test]
    fn spdx_purl_first_match_wins_case_insensitively() {
        let doc = json!({
            "spdxVersion": "SPDX-2.3",
            "packages": [{
                "name": "a",
                "externalRefs": [
                    { "referenceType": "cpe23Type", "referenceLocator": "cpe:2.3:..." },
                    { "referenceType": "PURL", "referenceLocator": "pkg:npm/a@1.0.0" },
                    { "referenceType": "purl", "referenceLocator": "pkg:npm/a@2.0.0" }
                ]
            }]
        });
        let parsed = parse_sbom(&doc);
        assert_eq!(
            parsed.components[0].purl.as_deref(),
            Some("pkg:npm/a@1.0.0")
        );
    }

    #[test]
    fn spdx_purl_tolerates_malformed_refs() {
        let doc = json!({
            "spdxVersion": "SPDX-2.3",
            "packages": [
                { "name": "a", "externalRefs": "not-an-array" },
                { "name": "b", "externalRefs": [ "junk", { "referenceType": "purl" }, { "referenceType": "purl", "referenceLocator": "pkg:pypi/b@3" } ] },
                { "name": "c" }
            ]
        });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.components[0].purl, None);
        assert_eq!(parsed.components[1].purl.as_deref(), Some("pkg:pypi/b@3"));
        assert_eq!(parsed.components[2].purl, None);
    }

    #[test]
    fn spdx_skips_non_object_packages() {
        let doc = json!({
            "spdxVersion": "SPDX-2.3",
            "packages": [7, { "name": "real" }, false]
        });
        let parsed = parse_sbom(&doc);
        assert_eq!(parsed.components.len(), 1);
        assert_eq!(parsed.components[0].name, "real");
    }

    #[test]
    fn unrecognized_documents_yield_other_and_no_components() {
        let parsed = parse_sbom(&json!({ "hello": "world", "components": [{ "name": "x" }] }));
        assert_eq!(parsed.format, SbomFormat::Other);
        assert_eq!(parsed.spec_version, None);
        assert!(parsed.components.is_empty());
    }
}
