//! Final report: cutoff filtering and CSV output
//!
//! Rows are emitted in the (target, event) order of the significance
//! stage, which mirrors the enrichment table. A pair is reported only if
//! its EF exceeds the EF cutoff and its q-value is below the q-value
//! cutoff, both strictly. Numeric fields are rendered with 5 significant
//! digits.

use std::io::Write;

use tracing::info;

use crate::associations::TargetMap;
use crate::config::AnalysisConfig;
use crate::stats::enrichment::EnrichmentTable;
use crate::stats::Significance;
use crate::EfaResult;

/// Significant digits of the numeric report fields
const REPORT_DIGITS: usize = 5;

/// Writes the filtered report and returns the number of data rows
///
/// The header row is always written, even if no pair survives the
/// cutoffs.
///
/// # Errors
///
/// [`EfaError::Csv`](`crate::EfaError::Csv`) or
/// [`EfaError::Io`](`crate::EfaError::Io`) if the writer fails.
pub fn write_report<W: Write>(
    writer: W,
    efs: &EnrichmentTable,
    targets: &TargetMap,
    significance: &Significance,
    config: &AnalysisConfig,
) -> EfaResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["uniprot_id", "targ_name", "event", "ef", "p-value", "q-value"])?;

    let mut count = 0;
    for (pair, pvalue, qvalue) in significance.iter() {
        let ef = efs
            .ef(pair)
            .expect("every tested pair has an enrichment factor");
        if ef > config.ef_cutoff && qvalue < config.qvalue_cutoff {
            let (target, event) = pair;
            let name = targets.info(target).map_or("", |info| info.name());
            let ef = format_sig(ef, REPORT_DIGITS);
            let pvalue = format_sig(pvalue, REPORT_DIGITS);
            let qvalue = format_sig(qvalue, REPORT_DIGITS);
            csv_writer.write_record([
                target.as_str(),
                name,
                event.as_str(),
                ef.as_str(),
                pvalue.as_str(),
                qvalue.as_str(),
            ])?;
            count += 1;
        }
    }
    csv_writer.flush()?;
    info!("Wrote {count} rows to the report");
    Ok(count)
}

/// Renders a float with `digits` significant digits, `%g`-style
///
/// Fixed notation is used while the decimal exponent fits in
/// `[-4, digits)`, scientific notation with a sign and a two-digit
/// exponent otherwise. Trailing zeros are stripped in both forms.
pub fn format_sig(value: f64, digits: usize) -> String {
    debug_assert!(digits > 0);
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // round to the requested precision first; rounding may change the
    // exponent (e.g. 9.9999e-5 -> 1e-4), which decides the notation
    let scientific = format!("{value:.prec$e}", prec = digits - 1);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .expect("e-notation always contains an exponent");
    let exponent: i32 = exponent
        .parse()
        .expect("e-notation exponent is a valid integer");

    if exponent < -4 || exponent >= digits as i32 {
        let mantissa = trim_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    } else {
        let decimals = digits as i32 - 1 - exponent;
        let fixed = format!("{value:.prec$}", prec = decimals.max(0) as usize);
        trim_zeros(&fixed).to_string()
    }
}

/// Strips trailing zeros, and the decimal point if nothing follows it
fn trim_zeros(rendered: &str) -> &str {
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::associations::{EventMap, TargetInfo};
    use crate::stats::contingency::build_tables;
    use crate::stats::MarginalSums;

    #[test]
    fn fixed_notation_inside_the_window() {
        assert_eq!(format_sig(1.0, 5), "1");
        assert_eq!(format_sig(4.0 / 3.0, 5), "1.3333");
        assert_eq!(format_sig(123.456, 5), "123.46");
        assert_eq!(format_sig(99999.0, 5), "99999");
        assert_eq!(format_sig(0.00012345, 5), "0.00012345");
        assert_eq!(format_sig(-2.5, 5), "-2.5");
    }

    #[test]
    fn scientific_notation_outside_the_window() {
        assert_eq!(format_sig(1.0e-5, 5), "1e-05");
        assert_eq!(format_sig(123456.0, 5), "1.2346e+05");
        assert_eq!(format_sig(3.14159e-7, 5), "3.1416e-07");
        assert_eq!(format_sig(6.02e23, 5), "6.02e+23");
    }

    #[test]
    fn rounding_can_promote_the_exponent() {
        assert_eq!(format_sig(0.000099999, 5), "9.9999e-05");
        assert_eq!(format_sig(0.0000999999, 5), "0.0001");
    }

    #[test]
    fn zero_renders_bare() {
        assert_eq!(format_sig(0.0, 5), "0");
    }

    fn report_fixture() -> (EnrichmentTable, TargetMap, Significance) {
        let events = EventMap::from_pairs([
            ("m1".into(), "e1".into()),
            ("m2".into(), "e1".into()),
            ("m2".into(), "e2".into()),
            ("m3".into(), "e2".into()),
        ]);
        let (targets, _) = TargetMap::from_rows(
            [
                ("m1".into(), "t1".into(), TargetInfo::new("COX1", "cyclooxygenase")),
                ("m2".into(), "t1".into(), TargetInfo::new("COX1", "cyclooxygenase")),
                ("m2".into(), "t2".into(), TargetInfo::new("HERG", "potassium channel")),
                ("m3".into(), "t2".into(), TargetInfo::new("HERG", "potassium channel")),
            ],
            &events.molecules(),
        );
        let sums = MarginalSums::compute(&events, &targets).unwrap();
        let efs = EnrichmentTable::compute(&sums, &events, &targets, 1);
        let tables = build_tables(&efs, &events, &targets);
        let significance = Significance::compute(&tables, None).unwrap();
        (efs, targets, significance)
    }

    #[test]
    fn header_is_written_even_when_nothing_passes() {
        let (efs, targets, significance) = report_fixture();
        let config = AnalysisConfig::default();

        let mut out = Vec::new();
        let count = write_report(&mut out, &efs, &targets, &significance, &config).unwrap();
        assert_eq!(count, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "uniprot_id,targ_name,event,ef,p-value,q-value\n"
        );
    }

    #[test]
    fn passing_rows_carry_target_names() {
        let (efs, targets, significance) = report_fixture();
        let config = AnalysisConfig {
            min_pairs: 1,
            ef_cutoff: 1.0,
            qvalue_cutoff: 1.5,
            bonferroni: false,
        };

        let mut out = Vec::new();
        let count = write_report(&mut out, &efs, &targets, &significance, &config).unwrap();
        // only the two EF = 4/3 pairs clear ef_cutoff = 1.0
        assert_eq!(count, 2);

        let rendered = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].starts_with("t1,COX1,e1,1.3333,"));
        assert!(rows[2].starts_with("t2,HERG,e2,1.3333,"));
    }

    #[test]
    fn cutoffs_are_strict() {
        let (efs, targets, significance) = report_fixture();
        // every q-value of the fixture is 1.0 after Holm clipping; a
        // cutoff of exactly 1.0 must exclude them all
        let config = AnalysisConfig {
            min_pairs: 1,
            ef_cutoff: 0.0,
            qvalue_cutoff: 1.0,
            bonferroni: false,
        };

        let mut out = Vec::new();
        let count = write_report(&mut out, &efs, &targets, &significance, &config).unwrap();
        assert_eq!(count, 0);
    }
}
