use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use pretty_assertions::assert_eq;
use presign_core::time::from_timestamp;
use presign_core::Result;
use presign_s3::{canonicalize, sign, Credential, Expiry, RequestSigner};
use sha1::Sha1;
use test_case::test_case;
use url::Url;

const NOW: i64 = 1_000_000_000;

/// Independent HMAC-SHA1 used to check the signer's output.
fn reference_signature(key: &str, string_to_sign: &str) -> String {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("any key length is valid");
    mac.update(string_to_sign.as_bytes());
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[test]
fn test_round_trip_with_default_expiry() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let cred = Credential::new("AKIDEXAMPLE", "secret", "s3");
    let signed = RequestSigner::new()
        .with_time(from_timestamp(NOW)?)
        .sign(
            &cred,
            "https://bucket.example.com/videos/a.mp4",
            Expiry::default(),
        )?;

    let url = Url::parse(&signed.to_string()).expect("signed url must parse");
    assert_eq!("https", url.scheme());
    assert_eq!(Some("s3.amazonaws.com"), url.host_str());
    assert_eq!("/videos/a.mp4", url.path());
    assert_eq!(
        Some("AKIDEXAMPLE".to_string()),
        query_value(&url, "AWSAccessKeyId")
    );
    assert_eq!(Some("1000000180".to_string()), query_value(&url, "Expires"));
    assert_eq!(
        Some(reference_signature(
            "secret",
            "GET\n\n\n1000000180\n/videos/a.mp4"
        )),
        query_value(&url, "Signature")
    );

    let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
    assert_eq!(vec!["AWSAccessKeyId", "Expires", "Signature"], keys);
    Ok(())
}

#[test_case(""; "empty key")]
#[test_case("secret"; "short key")]
#[test_case("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY"; "aws style key")]
#[test_case("0123456789012345678901234567890123456789012345678901234567890123"; "block sized key")]
#[test_case("this secret key is deliberately longer than the sixty four byte block of sha1"; "long key")]
fn test_sign_matches_reference(key: &str) {
    let s = canonicalize(&http::Method::GET, "", "", NOW + 180, "/videos/a.mp4");
    assert_eq!(reference_signature(key, &s), sign(key, &s));
}

#[test]
fn test_expires_shifts_with_now() -> Result<()> {
    let cred = Credential::new("AKIDEXAMPLE", "secret", "s3");
    let expiry = Expiry::parse("2")?.expect("two minutes is not the default");

    for delta in [0_i64, 1, 59, 3600, 86_400] {
        let signed = RequestSigner::new()
            .with_time(from_timestamp(NOW + delta)?)
            .sign(&cred, "https://bucket.example.com/videos/a.mp4", expiry)?;
        assert_eq!(NOW + delta + 120, signed.expires());

        let s = canonicalize(&http::Method::GET, "", "", signed.expires(), "/videos/a.mp4");
        assert_eq!(reference_signature("secret", &s), signed.signature());
    }
    Ok(())
}

#[test]
fn test_reserved_characters_are_encoded() -> Result<()> {
    let cred = Credential::new("AKIDEXAMPLE", "secret", "s3");
    let signed = RequestSigner::new()
        .with_time(from_timestamp(NOW)?)
        .sign(
            &cred,
            "https://bucket.example.com/media/2024/my clip+final (1).mp4",
            Expiry::default(),
        )?;

    assert_eq!(
        "media/2024/my%20clip%2Bfinal%20%281%29.mp4",
        signed.object_path()
    );
    let s = canonicalize(
        &http::Method::GET,
        "",
        "",
        NOW + 180,
        "/media/2024/my clip+final (1).mp4",
    );
    assert_eq!(
        "GET\n\n\n1000000180\n/media/2024/my%20clip%2Bfinal%20%281%29.mp4",
        s
    );
    assert_eq!(reference_signature("secret", &s), signed.signature());
    Ok(())
}

#[test_case("/media/my clip.mp4", "/media/my%20clip.mp4"; "raw path")]
#[test_case("/media/my%20clip.mp4", "/media/my%20clip.mp4"; "encoded path")]
#[test_case("/media/a%FF.mp4", "/media/a%FF.mp4"; "non utf8 escape")]
#[test_case("/media/../a\\b.mp4", "/media/../a%5Cb.mp4"; "unnormalized path")]
fn test_canonical_resource_is_not_double_encoded(path: &str, expected: &str) {
    let s = canonicalize(&http::Method::GET, "", "", NOW + 180, path);
    assert_eq!(format!("GET\n\n\n1000000180\n{expected}"), s);
}

#[test]
fn test_signed_path_is_kept_verbatim() -> Result<()> {
    let cred = Credential::new("AKIDEXAMPLE", "secret", "s3.us-west-2");
    let signed = RequestSigner::new()
        .with_time(from_timestamp(NOW)?)
        .sign(
            &cred,
            "https://bucket.example.com/media/../a\\b%FF.mp4",
            Expiry::default(),
        )?;

    assert_eq!("s3.us-west-2.amazonaws.com", signed.endpoint_host());
    assert_eq!("media/../a%5Cb%FF.mp4", signed.object_path());
    let s = canonicalize(&http::Method::GET, "", "", NOW + 180, "/media/../a%5Cb%FF.mp4");
    assert_eq!(reference_signature("secret", &s), signed.signature());
    Ok(())
}
