//! # Workflows Module
//!
//! The four operations a project goes through, each a plain function over a
//! configuration built in [`crate::engine::config`]:
//!
//! - **Prepare** ([`prepare`]) - Geometry files and charges to Q-Chem inputs and submit scripts
//! - **Submit** ([`submit`]) - Hand every submit script to the batch scheduler
//! - **Collect** ([`collect`]) - Q-Chem outputs to JSON records, optionally one per job
//! - **Discover** ([`discover`]) - Molecule names present in the input directory
//!
//! Molecules are processed one at a time, in name order, and the first error
//! ends the run.

pub mod collect;
pub mod discover;
pub mod prepare;
pub mod submit;

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;

    pub const WATER_XYZ: &str = "3
water
O    0.000000    0.000000    0.117300
H    0.000000    0.757200   -0.469200
H    0.000000   -0.757200   -0.469200
";

    pub const SHORT_QOUT: &str = "\
--------------------------------------------------------------
User input:
--------------------------------------------------------------
$molecule
 0 1
 O      0.0000000000      0.0000000000      0.1173000000
 H      0.0000000000      0.7572000000     -0.4692000000
 H      0.0000000000     -0.7572000000     -0.4692000000
$end

$rem
   job_type = sp
   basis = def2-svpd
   method = wb97x-v
$end
--------------------------------------------------------------
 Total energy in the final basis set =      -76.3812345678
 Total job time:  1.20s(wall), 2.40s(cpu)
 Thank you very much for using Q-Chem.  Have a nice day.
";

    /// Lays out `<root>/init_mols` with the given geometry files and charge table.
    pub fn project_with(root: &Path, files: &[(&str, &str)], charges: &str) {
        let input = root.join("init_mols");
        fs::create_dir_all(&input).unwrap();
        for (name, content) in files {
            fs::write(input.join(name), content).unwrap();
        }
        fs::write(input.join("charge.json"), charges).unwrap();
    }
}
