use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

/// splitmix64 stream; only needs to be repeatable, not strong.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }

    /// Normal noise via Box-Muller.
    fn noise(&mut self, std_dev: f64) -> f64 {
        let u1 = self.uniform(f64::MIN_POSITIVE, 1.0);
        let u2 = self.uniform(0.0, 1.0);
        std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

const HEADERS: [&str; 4] = ["alumno", "horas_estudio", "asistencia", "calificacion"];

/// Writes `muestra.xlsx`: a text column the loader drops, two numeric
/// features (hours studied, attendance %) and a grade that depends linearly
/// on both plus noise.
fn main() -> Result<()> {
    let mut rng = SampleRng(42);
    let output_path = "muestra.xlsx";
    let rows = 40;

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Datos")?;

    for (col, name) in HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *name, &bold)
            .with_context(|| format!("writing header '{name}'"))?;
    }

    for i in 0..rows {
        let row = i + 1;
        let hours = (rng.uniform(1.0, 10.0) * 10.0).round() / 10.0;
        let attendance = rng.uniform(60.0, 100.0).round();
        let grade = 0.5 + 0.7 * hours + 0.03 * attendance + rng.noise(0.6);

        sheet.write_string(row, 0, format!("Alumno {row:02}"))?;
        sheet.write_number(row, 1, hours)?;
        sheet.write_number(row, 2, attendance)?;
        sheet.write_number(row, 3, (grade * 100.0).round() / 100.0)?;
    }

    workbook
        .save(output_path)
        .with_context(|| format!("saving {output_path}"))?;

    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
