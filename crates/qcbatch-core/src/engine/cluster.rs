use crate::engine::config::ClusterProfile;

/// Renders the Slurm batch script that runs Q-Chem on `input_file`, writing
/// its log to `output_file`. Both paths are relative to the job directory,
/// which is the script's working directory at submission time.
pub fn render_submit_script(profile: &ClusterProfile, input_file: &str, output_file: &str) -> String {
    let mut script = String::from("#!/bin/bash -l\n\n");
    let directives = [
        ("nodes", profile.nodes.to_string()),
        ("qos", profile.qos.clone()),
        ("time", profile.walltime.clone()),
        ("partition", profile.partition.clone()),
        ("account", profile.account.clone()),
        ("job-name", profile.job_name.clone()),
        ("output", "FW_job-%j.out".to_string()),
        ("error", "FW_job-%j.error".to_string()),
        ("ntasks", profile.ntasks.to_string()),
    ];
    for (key, value) in directives {
        script.push_str(&format!("#SBATCH --{key}={value}\n"));
    }
    script.push('\n');

    for line in &profile.setup {
        script.push_str(line);
        script.push('\n');
    }
    for module in &profile.modules {
        script.push_str(&format!("module load {module}\n"));
    }
    if !profile.setup.is_empty() || !profile.modules.is_empty() {
        script.push('\n');
    }

    script.push_str(&format!("qchem {input_file} {output_file}\n"));
    script
}
