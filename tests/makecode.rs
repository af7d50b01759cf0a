use universal_hex::{Error, IndividualHex, Layout, StateError, create_uhex, is_makecode_v1};

const PROGRAM: &str = "\
:020000040000FA
:1000000000400020218E01005D8E01005F8E010006
:1000100000000000000000000000000000000000E0
";

const RAM_ADDRESS: &str = ":020000042000DA\n";
const RAM_DATA: &str = ":0400000000000000FC\n";
const METADATA: &str = ":0402800E0102030462\n";
const EOF: &str = ":00000001FF\n";

#[test]
fn plain_program_is_not_makecode() {
    assert!(!is_makecode_v1(&format!("{PROGRAM}{EOF}")));
}

#[test]
fn document_without_end_of_file_is_not_makecode() {
    assert!(!is_makecode_v1(PROGRAM));
    assert!(!is_makecode_v1(&format!("{PROGRAM}{RAM_ADDRESS}{RAM_DATA}")));
    assert!(!is_makecode_v1(""));
}

#[test]
fn records_after_end_of_file_are_makecode() {
    assert!(is_makecode_v1(&format!("{PROGRAM}{EOF}{METADATA}")));
    assert!(is_makecode_v1(&format!("{PROGRAM}{EOF}{RAM_ADDRESS}{RAM_DATA}")));
}

#[test]
fn data_written_to_ram_is_makecode() {
    assert!(is_makecode_v1(&format!("{PROGRAM}{RAM_ADDRESS}{RAM_DATA}{EOF}")));

    // Extended Segment Address 0x2000 maps to 0x00020000, outside RAM.
    let segment = ":020000022000DC\n";
    assert!(!is_makecode_v1(&format!("{PROGRAM}{segment}{RAM_DATA}{EOF}")));

    // Address records alone write nothing.
    assert!(!is_makecode_v1(&format!("{PROGRAM}{RAM_ADDRESS}{EOF}")));
}

#[test]
fn combining_makecode_fails() {
    let makecode = [
        format!("{PROGRAM}{RAM_ADDRESS}{RAM_DATA}{EOF}"),
        format!("{PROGRAM}{EOF}{METADATA}"),
        format!("{PROGRAM}{EOF}{RAM_ADDRESS}{RAM_DATA}"),
    ];

    for hex in makecode {
        let hexes = [
            IndividualHex::new(format!("{PROGRAM}{EOF}"), 0x9903),
            IndividualHex::new(hex, 0x9900),
        ];
        for layout in [Layout::Sections, Layout::Blocks] {
            let err = create_uhex(&hexes, layout).unwrap_err();
            assert_eq!(err, Error::State(StateError::MakeCode(0x9900)));
            assert!(err.to_string().contains("MakeCode"));
        }
    }
}
