use anyhow::Result;
use export_cleanup::{
    EtlEngine, EtlError, ExportConfig, ExportPipeline, LocalStorage, MalformedDatePolicy,
};
use std::fs;
use tempfile::TempDir;

const EXPORT: &str = "\
phone,name,email,points,birthday,notes,created_at
5551234567,Ann,a@x.com,10,1990-01-05,vip customer,2020-01-01
555123,Bob,b@x.com,3,,,2020-01-02
,Cat,c@x.com,7,1985-07-23,no phone,2020-01-03
5559876543,\"Dee, Jr\",d@x.com,0,,\"likes \"\"coffee\"\"\",2020-01-04
";

fn engine(
    temp_dir: &TempDir,
    input: &str,
    policy: MalformedDatePolicy,
) -> Result<EtlEngine<ExportPipeline<LocalStorage, ExportConfig>>> {
    fs::write(temp_dir.path().join("in.csv"), input)?;

    let config = ExportConfig {
        input_path: "in.csv".to_string(),
        output_path: "out.csv".to_string(),
        date_policy: policy,
    };
    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());
    Ok(EtlEngine::new(ExportPipeline::new(storage, config)))
}

#[tokio::test]
async fn test_end_to_end_export_cleanup() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let summary = engine(&temp_dir, EXPORT, MalformedDatePolicy::Abort)?
        .run()
        .await?;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.rejected, 2);
    assert_eq!(summary.output_path, "out.csv");

    let output = fs::read_to_string(temp_dir.path().join("out.csv"))?;
    assert_eq!(
        output,
        "phone,name,last_name,email,points,birthday,vip,notes\n\
         5551234567,Ann,,a@x.com,10,01/05,,vip customer\n\
         5559876543,\"Dee, Jr\",,d@x.com,0,,,\"likes \"\"coffee\"\"\"\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_existing_output_is_replaced() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("out.csv"), "stale contents that are longer than the new file")?;

    engine(&temp_dir, "phone,name\n5551234567,Ann\n", MalformedDatePolicy::Abort)?
        .run()
        .await?;

    let output = fs::read_to_string(temp_dir.path().join("out.csv"))?;
    assert_eq!(
        output,
        "phone,name,last_name,email,points,birthday,vip,notes\n5551234567,Ann,,,,,,\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_malformed_csv_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let result = engine(
        &temp_dir,
        "phone,name\n5551234567,\"Ann\n5559876543,Bob\n",
        MalformedDatePolicy::Abort,
    )?
    .run()
    .await;

    let err = result.unwrap_err();
    assert!(err.is_parse_error());
    assert!(!temp_dir.path().join("out.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_malformed_birthday_keeps_previous_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("out.csv"), "previous run\n")?;

    let result = engine(
        &temp_dir,
        "phone,birthday\n5551234567,1990-01-05\n5559876543,01/05/1990\n",
        MalformedDatePolicy::Abort,
    )?
    .run()
    .await;

    assert!(matches!(result, Err(EtlError::MalformedDate { line: 3, .. })));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("out.csv"))?,
        "previous run\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_skip_row_policy_reports_skipped_dates() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let summary = engine(
        &temp_dir,
        "phone,birthday\n5551234567,1990-01-05\n5559876543,01/05/1990\n",
        MalformedDatePolicy::SkipRow,
    )?
    .run()
    .await?;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.skipped_dates, 1);
    assert_eq!(summary.accepted + summary.rejected, summary.total);
    Ok(())
}

#[tokio::test]
async fn test_missing_input_is_file_not_found() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = ExportConfig {
        input_path: "absent.csv".to_string(),
        output_path: "out.csv".to_string(),
        date_policy: MalformedDatePolicy::Abort,
    };
    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());
    let result = EtlEngine::new(ExportPipeline::new(storage, config)).run().await;

    let err = result.unwrap_err();
    assert!(matches!(err, EtlError::FileNotFound { .. }));
    assert_eq!(err.severity().exit_code(), 1);
    Ok(())
}
