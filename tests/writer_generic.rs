use mdf4_core::{DataType, DecodedValue, FlushPolicy, MDF, MdfWriter, Result, VecWriter};

/// Writing through an in-memory `VecWriter` should produce the same bytes
/// a file-backed writer would, and the result should parse back correctly
/// once persisted.
#[test]
fn vec_writer_roundtrip() -> Result<()> {
    let mut writer = MdfWriter::from_writer(VecWriter::new());
    writer.init_mdf_file()?;
    let cg_id = writer.add_channel_group(None, |_| {})?;
    let time_id = writer.add_channel(&cg_id, None, |ch| {
        ch.data_type = DataType::FloatLE;
        ch.name = Some("Time".into());
        ch.bit_count = 64;
    })?;
    writer.set_time_channel(&time_id)?;
    writer.add_channel(&cg_id, Some(&time_id), |ch| {
        ch.data_type = DataType::UnsignedIntegerLE;
        ch.bit_count = 32;
        ch.name = Some("Value".into());
    })?;

    writer.start_data_block_for_cg(&cg_id, 0)?;
    for i in 0..5u64 {
        writer.write_record(
            &cg_id,
            &[
                DecodedValue::Float(i as f64),
                DecodedValue::UnsignedInteger(i),
            ],
        )?;
    }
    writer.finish_data_block(&cg_id)?;
    writer.finalize()?;

    let bytes = writer.into_writer().into_inner();

    let path = std::env::temp_dir().join("vec_writer_roundtrip.mf4");
    std::fs::write(&path, &bytes)?;

    let mdf = MDF::from_file(path.to_str().unwrap())?;
    let groups = mdf.channel_groups();
    assert_eq!(groups.len(), 1);
    let chs = groups[0].channels();
    assert_eq!(chs.len(), 2);

    let times = chs[0].values()?;
    let values = chs[1].values()?;
    assert_eq!(times.len(), 5);
    assert_eq!(values.len(), 5);
    for i in 0..5u64 {
        match times[i as usize] {
            Some(DecodedValue::Float(t)) => assert!((t - i as f64).abs() < 1e-9),
            other => panic!("unexpected {:?}", other),
        }
        match values[i as usize] {
            Some(DecodedValue::UnsignedInteger(v)) => assert_eq!(v, i),
            other => panic!("unexpected {:?}", other),
        }
    }

    std::fs::remove_file(path)?;
    Ok(())
}

/// An aggressive auto-flush policy must not change the data actually written;
/// flushing is purely about when bytes reach the backing store.
#[test]
fn flush_policy_every_record_preserves_data() -> Result<()> {
    let path = std::env::temp_dir().join("flush_policy_test.mf4");
    if path.exists() {
        std::fs::remove_file(&path)?;
    }

    let mut writer = MdfWriter::new(path.to_str().unwrap())?
        .with_flush_policy(FlushPolicy::EveryNRecords(1));
    writer.init_mdf_file()?;
    let cg_id = writer.add_channel_group(None, |_| {})?;
    writer.add_channel(&cg_id, None, |ch| {
        ch.data_type = DataType::UnsignedIntegerLE;
        ch.bit_count = 32;
    })?;

    writer.start_data_block_for_cg(&cg_id, 0)?;
    for i in 0..20u64 {
        writer.write_record(&cg_id, &[DecodedValue::UnsignedInteger(i)])?;
    }
    writer.finish_data_block(&cg_id)?;
    writer.finalize()?;

    let mdf = MDF::from_file(path.to_str().unwrap())?;
    let groups = mdf.channel_groups();
    let vals = groups[0].channels()[0].values()?;
    assert_eq!(vals.len(), 20);
    for i in 0..20u64 {
        match vals[i as usize] {
            Some(DecodedValue::UnsignedInteger(v)) => assert_eq!(v, i),
            other => panic!("unexpected {:?}", other),
        }
    }

    std::fs::remove_file(path)?;
    Ok(())
}

/// `FlushPolicy::default()` is manual: writes should behave identically to a
/// writer that never calls `with_flush_policy` at all.
#[test]
fn default_flush_policy_is_manual() {
    assert_eq!(FlushPolicy::default(), FlushPolicy::Manual);
    assert!(!FlushPolicy::default().is_auto());
}
