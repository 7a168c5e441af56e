//! Inspect the built-in filter and Lick index libraries
//!
//! Prints bandpass characteristics and zero points, evaluates flat spectra in
//! every magnitude system, and measures Lick indices on the Vega reference.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use synphot::photometry::{
    reduce_to_lick_resolution, vega_reference, Band, BuiltinLickLibrary, FilterLibrary,
    LickIndexCalculator, LickLibrary, MagnitudeSystem, MemoryFilterLibrary, PhotometryEngine,
    SampledSpectrum,
};
use synphot::quantity::catalog::{parse_flux_unit, ANGSTROM, FLAM, JANSKY};
use synphot::units::{Length, LengthExt};
use synphot::Quantity;

#[derive(Parser, Debug)]
#[command(
    name = "synphot-info",
    about = "Synthetic photometry against the built-in filter and Lick libraries",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List filters, optionally only those whose name contains PATTERN
    Filters {
        pattern: Option<String>,

        /// Match PATTERN case-sensitively
        #[arg(long)]
        case_sensitive: bool,
    },

    /// Show characteristic wavelengths and zero points of a filter
    Filter { name: String },

    /// Magnitudes of a flat spectrum through a filter in every system
    Flat {
        /// Filter name
        filter: String,

        /// Flux density of the spectrum
        #[arg(long, default_value_t = 1.0e-15)]
        flux: f64,

        /// Unit of --flux (flam, fnu, Jy, photlam, photnu)
        #[arg(long, default_value = "flam")]
        unit: String,
    },

    /// List Lick indices, optionally only those whose name contains PATTERN
    Licks {
        pattern: Option<String>,

        /// Match PATTERN case-sensitively
        #[arg(long)]
        case_sensitive: bool,
    },

    /// Measure Lick indices on the Vega reference spectrum
    Lick {
        /// Index names (all indices when omitted)
        names: Vec<String>,

        /// Broaden to Lick/IDS resolution first, assuming this FWHM in Å
        #[arg(long)]
        fwhm0: Option<f64>,
    },
}

fn angstroms(quantity: Quantity) -> Result<f64> {
    Ok(Length::try_from(quantity)?.as_angstroms())
}

fn show_filter(library: &MemoryFilterLibrary, name: &str) -> Result<()> {
    let bandpass = library
        .load_filter(name)
        .with_context(|| format!("Loading filter {name}"))?;
    let engine = PhotometryEngine::new();

    println!("Filter {} ({} detector)", bandpass.name(), bandpass.detector_type());
    println!("{:-<40}", "");
    println!("{:<24} {:>12.2} Å", "Central wavelength", angstroms(bandpass.central_wavelength())?);
    println!("{:<24} {:>12.2} Å", "Pivot wavelength", angstroms(bandpass.pivot_wavelength())?);
    println!("{:<24} {:>12.2} Å", "Effective wavelength", angstroms(bandpass.effective_wavelength()?)?);
    println!("{:<24} {:>12.2} Å", "Photon wavelength", angstroms(bandpass.photon_wavelength()?)?);
    println!("{:<24} {:>12.2} Å", "Min wavelength", angstroms(bandpass.min_wavelength())?);
    println!("{:<24} {:>12.2} Å", "Max wavelength", angstroms(bandpass.max_wavelength())?);
    println!("{:<24} {:>12.2} Å", "Effective width", angstroms(bandpass.effective_width())?);
    println!("{:<24} {:>12.2} Å", "FWHM", angstroms(bandpass.fwhm())?);
    println!();

    println!("{:<6} {:>10} {:>16} {:>14}", "System", "ZP (mag)", "Flux (flam)", "Flux (Jy)");
    for system in MagnitudeSystem::ALL.into_iter().filter(|s| s.is_magnitude()) {
        let zp = engine.zero_point(&bandpass, system)?;
        println!(
            "{:<6} {:>10.4} {:>16.4e} {:>14.2}",
            zp.system.to_string(),
            zp.magnitude,
            zp.flux.to(FLAM)?,
            zp.flux_frequency.to(JANSKY)?
        );
    }
    Ok(())
}

fn show_flat(library: &MemoryFilterLibrary, filter: &str, flux: f64, unit: &str) -> Result<()> {
    let bandpass = library
        .load_filter(filter)
        .with_context(|| format!("Loading filter {filter}"))?;
    let unit = parse_flux_unit(unit)?;

    // Flat in the given unit over a range comfortably wider than the filter
    let support = bandpass.support();
    let band = Band::new(0.5 * support.lower, 2.0 * support.upper)?;
    let spectrum = SampledSpectrum::flat(&band, Quantity::new(flux, unit), 2001)?;

    let engine = PhotometryEngine::new();
    println!("Flat spectrum of {flux:e} through {}", bandpass.name());
    for system in MagnitudeSystem::ALL {
        let result = engine.compute(&spectrum, &bandpass, system)?;
        println!("{:<6} {:>12.4}", system.to_string(), result.value);
    }
    Ok(())
}

fn show_lick(library: &BuiltinLickLibrary, names: &[String], fwhm0: Option<f64>) -> Result<()> {
    let names = if names.is_empty() {
        library.content()
    } else {
        names.to_vec()
    };

    let spectrum = match fwhm0 {
        Some(fwhm0) => reduce_to_lick_resolution(vega_reference(), fwhm0 * ANGSTROM, 0.5 * ANGSTROM)?,
        None => vega_reference().clone(),
    };

    let calculator = LickIndexCalculator::new();
    for name in names {
        let definition = library.load_index(&name)?;
        match calculator.compute(&spectrum, &definition) {
            Ok(value) => {
                let unit = if definition.is_magnitude { "mag" } else { "Å" };
                println!("{:<16} {:>10.4} {unit}", definition.name, value);
            }
            Err(e) => log::warn!("{name}: {e}"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let filters = MemoryFilterLibrary::johnson()?;
    let licks = BuiltinLickLibrary::new()?;

    match args.command {
        Command::Filters {
            pattern,
            case_sensitive,
        } => {
            let names = match pattern {
                Some(p) => filters.find(&p, case_sensitive),
                None => filters.content(),
            };
            for name in names {
                println!("{name}");
            }
        }
        Command::Filter { name } => show_filter(&filters, &name)?,
        Command::Flat { filter, flux, unit } => show_flat(&filters, &filter, flux, &unit)?,
        Command::Licks {
            pattern,
            case_sensitive,
        } => {
            let names = match pattern {
                Some(p) => licks.find(&p, case_sensitive),
                None => licks.content(),
            };
            for name in names {
                let definition = licks.load_index(&name)?;
                println!("{:<16} {}", name, definition.description);
            }
        }
        Command::Lick { names, fwhm0 } => show_lick(&licks, &names, fwhm0)?,
    }

    Ok(())
}
