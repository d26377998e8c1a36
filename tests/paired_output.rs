//! Paired device listing integration tests

use macbuds::bluetooth::{list_paired, parse_paired_output, BluetoothTool};
use macbuds::{Device, Error, Result};

/// Replays canned `--paired` output
struct FixtureTool(&'static str);

impl BluetoothTool for FixtureTool {
    fn run(&self, args: &[&str]) -> Result<String> {
        assert_eq!(args, ["--paired"]);
        Ok(self.0.to_string())
    }
}

#[test]
fn test_parse_paired_fixture() {
    let fixture = include_str!("fixtures/blueutil_paired.txt");

    let devices = parse_paired_output(fixture);

    assert_eq!(
        devices,
        vec![
            Device::new("28-6f-40-1b-2a-55", "Studio Buds"),
            Device::new("a4-c1-38-0e-11-9d", "Kitchen Speaker, Left"),
            Device::new("04-fe-a1-77-3c-02", "Ann's \"Quiet\" Headphones"),
        ]
    );
}

#[test]
fn test_display_labels() {
    let fixture = include_str!("fixtures/blueutil_paired.txt");

    let labels: Vec<String> = parse_paired_output(fixture)
        .iter()
        .map(Device::display_label)
        .collect();

    assert_eq!(labels[0], "Studio Buds (28-6f-40-1b-2a-55)");
    assert_eq!(labels[1], "Kitchen Speaker, Left (a4-c1-38-0e-11-9d)");
}

#[test]
fn test_list_paired_through_tool() {
    let tool = FixtureTool(include_str!("fixtures/blueutil_paired.txt"));

    let devices = list_paired(&tool).unwrap();
    assert_eq!(devices.len(), 3);
}

#[test]
fn test_list_paired_empty_output() {
    let tool = FixtureTool("\n\n");

    let err = list_paired(&tool).unwrap_err();
    assert!(matches!(err, Error::NoDevicesFound));
}
