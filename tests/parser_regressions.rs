// Regression tests for pasted calendar tickets.
use jobsheet::error::ParseError;
use jobsheet::model::{JobStatus, JobType, parse_job_text};

#[test]
fn test_full_google_calendar_paste() {
    let text = "Confirmed/wo/IKEA CT Wayne Zhan 12032430501\n\
                \n\
                Friday, December 12⋅11:00AM–3:00PM\n\
                123 Main St, Hartford, CT 06032, USA\n\
                \n\
                Replace damaged drawer front\n\
                Customer asked to call 30 min before\n";

    let job = parse_job_text(text).unwrap();
    assert_eq!(job.status, JobStatus::Confirmed);
    assert_eq!(job.job_type, JobType::Wo);
    assert_eq!(job.region, "CT");
    assert_eq!(job.customer.name, "Wayne Zhan");
    assert_eq!(job.customer.phone, "12032430501");
    assert_eq!(job.address, "123 Main St, Hartford, CT 06032,");
    assert_eq!(job.date, "Friday, December 12");
    assert_eq!(job.time, "11:00AM–3:00PM");
    assert_eq!(
        job.notes,
        "Replace damaged drawer front\nCustomer asked to call 30 min before"
    );
}

#[test]
fn test_russian_calendar_locale() {
    let text = "Confirmed IKEA prefit RENEE VIDA 18452062614\r\n\
                Пятница, 12 декабря⋅11:00AM–3:00PM\r\n\
                45 Oak Ave, Stamford, CT 06901 United States\r\n\
                Подъезд со двора\r\n";

    let job = parse_job_text(text).unwrap();
    assert_eq!(job.job_type, JobType::Prefit);
    assert_eq!(job.customer.name, "Renee Vida");
    assert_eq!(job.region, "");
    assert_eq!(job.date, "Пятница, 12 декабря");
    assert_eq!(job.time, "11:00AM–3:00PM");
    assert_eq!(job.address, "45 Oak Ave, Stamford, CT 06901");
    assert_eq!(job.notes, "Подъезд со двора");
}

#[test]
fn test_address_with_unit_suffix_and_zip_plus_four() {
    let text = "IKEA NY Leslie Yung 19176900772\n\
                9 Elm Rd, Rye, NY 10580-1234 Unit";

    let job = parse_job_text(text).unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.address, "9 Elm Rd, Rye, NY 10580-1234");
    assert_eq!(job.notes, "");
    // "-1" in the ZIP+4 also satisfies the date/time predicate.
    assert_eq!(job.date, "9 Elm Rd, Rye, NY 10580-1234 Unit");
    assert_eq!(job.time, "");
}

#[test]
fn test_first_matching_lines_win() {
    let text = "Confirmed/IKEA NJ Ana Lopez 9735550100\n\
                Monday⋅8:00AM–12:00PM\n\
                Tuesday⋅1:00PM–5:00PM\n\
                1 First St, Newark, NJ 07102\n\
                2 Second St, Newark, NJ 07103";

    let job = parse_job_text(text).unwrap();
    assert_eq!(job.date, "Monday");
    assert_eq!(job.time, "8:00AM–12:00PM");
    assert_eq!(job.address, "1 First St, Newark, NJ 07102");
    // The second address is only a note; the second time line matches the
    // date/time predicate and is dropped like the first.
    assert_eq!(job.notes, "2 Second St, Newark, NJ 07103");
}

#[test]
fn test_note_lines_with_dash_digits_are_dropped() {
    // "-2" looks like a time range, so the line never reaches the notes.
    let text = "IKEA CT Maria Gomez 2035550100\n\
                Cabinets B-2 and B-3 damaged\n\
                Bring touch-up kit";

    let job = parse_job_text(text).unwrap();
    assert_eq!(job.date, "Cabinets B-2 and B-3 damaged");
    assert_eq!(job.time, "");
    assert_eq!(job.notes, "Bring touch-up kit");
}

#[test]
fn test_emoji_and_short_noise_lines() {
    let text = "✅ Confirmed / IKEA / CT / John Smith 2035550100\n\
                📞\n\
                ok\n\
                Has a dog 🐕";

    let job = parse_job_text(text).unwrap();
    assert_eq!(job.status, JobStatus::Confirmed);
    // Slash right after the marker hides the region.
    assert_eq!(job.region, "");
    assert_eq!(job.customer.name, "Ct John Smith");
    assert_eq!(job.notes, "Has a dog 🐕");
}

#[test]
fn test_lowercase_marker_and_wo_word() {
    let job = parse_job_text("confirmed ikea wo CT Sam Lee 12035550123").unwrap();
    assert_eq!(job.job_type, JobType::Wo);
    assert_eq!(job.region, "CT");
    assert_eq!(job.customer.name, "Sam Lee");
}

#[test]
fn test_marker_inside_word_still_anchors() {
    let job = parse_job_text("Confirmed IKEACT Bob Stone 2035550100").unwrap();
    assert_eq!(job.region, "CT");
    assert_eq!(job.customer.name, "Bob Stone");
}

#[test]
fn test_failure_modes() {
    assert_eq!(parse_job_text("\n\n   \n"), Err(ParseError::Empty));
    assert_eq!(
        parse_job_text("Confirmed CT Wayne Zhan 12032430501\nIKEA Hartford"),
        Err(ParseError::NoAnchor)
    );
    assert_eq!(
        parse_job_text("Confirmed/wo/IKEA 12032430501"),
        Err(ParseError::NoName)
    );
}
