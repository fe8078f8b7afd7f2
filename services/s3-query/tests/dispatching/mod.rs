use std::collections::HashMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use presign_core::time::from_timestamp;
use presign_core::{Context, ErrorKind, OsEnv, StaticEnv};
use presign_s3::{
    Config, Dispatcher, Expiry, FixedOverride, PolicyTable, Resolution, ResourceSigningPolicy,
    StaticCredentialProvider,
};

const NOW: i64 = 1_000_000_000;
const URL: &str = "https://bucket.example.com/videos/a.mp4";

fn policies() -> PolicyTable {
    PolicyTable::from_toml_str(
        r#"
        [resources."1"]
        enabled = true

        [resources."2"]
        enabled = true
        expires_in_minutes = 0

        [resources."3"]
        enabled = true
        expires_in_minutes = ""

        [resources."4"]
        enabled = true
        expires_in_minutes = 10

        [resources."5"]
        enabled = false
        expires_in_minutes = 10
        "#,
    )
    .expect("policies must be valid")
}

fn signed_expires(resolution: Resolution) -> i64 {
    match resolution {
        Resolution::Signed(url) => url.expires(),
        Resolution::Skip => panic!("resource must be signed"),
    }
}

#[test]
fn test_default_expiry_quirks() {
    let d = Dispatcher::new(
        Context::new(),
        StaticCredentialProvider::new("AKIDEXAMPLE", "secret"),
        policies(),
    )
    .with_time(from_timestamp(NOW).unwrap());

    // No override, explicit 0 and explicit empty all mean 3 minutes.
    for id in ["1", "2", "3"] {
        let resolution = d.resolve_signing(URL, id).unwrap();
        assert_eq!(NOW + 180, signed_expires(resolution), "resource {id}");
    }
    assert_eq!(
        NOW + 600,
        signed_expires(d.resolve_signing(URL, "4").unwrap())
    );
    assert_eq!(Resolution::Skip, d.resolve_signing(URL, "5").unwrap());
}

#[test]
fn test_skip_regardless_of_credentials() {
    let d = Dispatcher::new(
        Context::new(),
        StaticCredentialProvider::new("", ""),
        policies(),
    );

    assert!(d.resolve_signing(URL, "5").unwrap().is_skip());
    assert!(d.resolve_signing(URL, "missing").unwrap().is_skip());
    assert_eq!(
        ErrorKind::CredentialMissing,
        d.resolve_signing(URL, "4").unwrap_err().kind()
    );
}

#[test]
fn test_missing_credentials_message_is_safe() {
    let d = Dispatcher::from_config(
        Context::new(),
        Config::new().with_region("s3-us-west-2"),
        policies(),
    )
    .expect("config must be valid");

    let err = d.resolve_signing(URL, "1").unwrap_err();
    assert!(err.is_config_error());
    assert_eq!(
        "missing credentials: access keys have not been entered yet",
        err.to_string()
    );
}

#[test]
fn test_credentials_from_env() {
    temp_env::with_vars(
        vec![
            ("PRESIGN_S3_ACCESS_KEY_ID", Some("AKIDEXAMPLE")),
            ("PRESIGN_S3_SECRET_ACCESS_KEY", Some("secret")),
            ("PRESIGN_S3_REGION", Some("s3-eu-west-1")),
            ("PRESIGN_S3_EXPIRES_IN", None),
        ],
        || {
            let ctx = Context::new().with_env(OsEnv);
            let d = Dispatcher::from_config(ctx, Config::new(), policies())
                .expect("config must be valid")
                .with_time(from_timestamp(NOW).unwrap());

            let url = d.filter_url(URL, "1").expect("must sign");
            assert!(url.starts_with(
                "https://s3-eu-west-1.amazonaws.com/videos/a.mp4?AWSAccessKeyId=AKIDEXAMPLE&Expires=1000000180&Signature="
            ));
        },
    );
}

#[test]
fn test_default_expiry_from_env() {
    temp_env::with_vars(
        vec![
            ("PRESIGN_S3_ACCESS_KEY_ID", Some("AKIDEXAMPLE")),
            ("PRESIGN_S3_SECRET_ACCESS_KEY", Some("secret")),
            ("PRESIGN_S3_REGION", None),
            ("PRESIGN_S3_EXPIRES_IN", Some("7")),
        ],
        || {
            let ctx = Context::new().with_env(OsEnv);
            let d = Dispatcher::from_config(ctx, Config::new(), policies())
                .expect("config must be valid")
                .with_time(from_timestamp(NOW).unwrap());

            // Resources without their own expiry use the env one.
            assert_eq!(
                NOW + 420,
                signed_expires(d.resolve_signing(URL, "1").unwrap())
            );
            assert_eq!(
                NOW + 420,
                signed_expires(d.resolve_signing(URL, "2").unwrap())
            );
            assert_eq!(
                NOW + 600,
                signed_expires(d.resolve_signing(URL, "4").unwrap())
            );
        },
    );
}

#[test]
fn test_override_with_dotted_region() {
    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from([
            (
                "PRESIGN_S3_ACCESS_KEY_ID".to_string(),
                "AKIDEXAMPLE".to_string(),
            ),
            ("PRESIGN_S3_SECRET_ACCESS_KEY".to_string(), "secret".to_string()),
        ]),
    });
    let d = Dispatcher::from_config(ctx, Config::new(), policies())
        .expect("config must be valid")
        .with_override(FixedOverride::new().with_region("s3.us-west-2"))
        .with_time(from_timestamp(NOW).unwrap());

    let url = d.filter_url(URL, "1").unwrap();
    assert!(url.starts_with("https://s3.us-west-2.amazonaws.com/videos/a.mp4?"));
}

#[test]
fn test_concurrent_signing() {
    let policies = Arc::new(
        PolicyTable::new().with_policy(
            "video",
            ResourceSigningPolicy::enabled().with_expires_in(Expiry::from_secs(60)),
        ),
    );
    let d = Dispatcher::new(
        Context::new(),
        StaticCredentialProvider::new("AKIDEXAMPLE", "secret"),
        policies,
    )
    .with_time(from_timestamp(NOW).unwrap());

    let expected = d.filter_url(URL, "video").unwrap().into_owned();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| d.filter_url(URL, "video").unwrap().into_owned()))
            .collect();
        for h in handles {
            assert_eq!(expected, h.join().expect("thread must not panic"));
        }
    });
}

#[test]
fn test_parse_error_is_surfaced() {
    let d = Dispatcher::new(
        Context::new(),
        StaticCredentialProvider::new("AKIDEXAMPLE", "secret"),
        policies(),
    );

    let err = d.filter_url("/videos/a.mp4", "1").unwrap_err();
    assert_eq!(ErrorKind::RequestInvalid, err.kind());
    assert!(!err.to_string().contains("secret"));
}
