use std::cmp::Ordering;
use std::env;
use std::process::Command;

// Backends we know how to build, keyed by the target features they need
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    target_features: &'static [&'static str],
    target_arches: &'static [&'static str],
    cfg_flag: &'static str,
    detected: bool,
    nightly_only: bool,
}

impl CpuFeature {
    // Define priority order between CPU Features (Lowest number == Highest Priority)
    fn priority(&self) -> usize {
        match self.name {
            "avx512f" => 0,
            "avx2" => 1,
            "sse4.1" => 2,
            "neon" => 3,
            _ => usize::MAX, // lowest priority by default
        }
    }

    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse4.1",
                target_features: &["sse4.1"],
                target_arches: &["x86", "x86_64"],
                cfg_flag: "sse",
                detected: false,
                nightly_only: false,
            },
            CpuFeature {
                name: "avx2",
                target_features: &["avx", "avx2"],
                target_arches: &["x86", "x86_64"],
                cfg_flag: "avx2",
                detected: false,
                nightly_only: false,
            },
            CpuFeature {
                name: "avx512f",
                target_features: &["avx2", "avx512f"],
                target_arches: &["x86_64"],
                cfg_flag: "avx512",
                detected: false,
                nightly_only: true,
            },
            CpuFeature {
                name: "neon",
                target_features: &["neon"],
                target_arches: &["aarch64"],
                cfg_flag: "neon",
                detected: false,
                nightly_only: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Feature detection trait to make implementations more modular
trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

// Reads the features rustc was told to target (`-C target-feature`, `-C target-cpu`).
// Intrinsics are only safe to inline when they are enabled at compile time, so the
// host CPU is not consulted.
struct TargetFeatureDetector {
    arch: String,
    enabled: Vec<String>,
    nightly: bool,
}

impl TargetFeatureDetector {
    fn from_env(nightly: bool) -> Self {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        let enabled = env::var("CARGO_CFG_TARGET_FEATURE")
            .unwrap_or_default()
            .split(',')
            .map(|feature| feature.trim().to_string())
            .filter(|feature| !feature.is_empty())
            .collect();

        Self {
            arch,
            enabled,
            nightly,
        }
    }
}

impl CpuFeatureDetector for TargetFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        for feature in features.iter_mut() {
            let arch_ok = feature.target_arches.contains(&self.arch.as_str());
            let features_ok = feature
                .target_features
                .iter()
                .all(|needed| self.enabled.iter().any(|have| have == needed));
            let channel_ok = !feature.nightly_only || self.nightly;

            feature.detected = arch_ok && features_ok && channel_ok;
        }
    }

    fn is_applicable(&self) -> bool {
        !self.arch.is_empty()
    }
}

// `SIMDVEC_BACKEND` narrows the choice to one backend (or `emulation`).
struct EnvOverride {
    requested: Option<String>,
}

impl CpuFeatureDetector for EnvOverride {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let Some(requested) = self.requested.as_deref() else {
            return;
        };

        let mut matched = false;
        for feature in features.iter_mut() {
            let selected = feature.cfg_flag == requested;
            if selected && !feature.detected {
                println!(
                    "cargo:warning=SIMDVEC_BACKEND={requested} requested but the target does not enable {:?}; using emulation",
                    feature.target_features
                );
            }
            matched |= selected;
            feature.detected &= selected;
        }

        if !matched && requested != "emulation" && requested != "fallback" {
            println!("cargo:warning=unknown SIMDVEC_BACKEND={requested}; using emulation");
        }
    }

    fn is_applicable(&self) -> bool {
        self.requested.is_some()
    }
}

struct PlatformDetector;
impl PlatformDetector {
    fn compiler_channel() -> String {
        let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
        let version_info = Command::new(rustc)
            .args(["--version", "--verbose"])
            .output()
            .map(|output| String::from_utf8_lossy(&output.stdout).to_string())
            .unwrap_or_default();

        if version_info.contains("nightly") {
            "nightly".to_string()
        } else {
            "stable".to_string()
        }
    }

    fn cpu_features_detectors(nightly: bool) -> Vec<Box<dyn CpuFeatureDetector>> {
        let requested = env::var("SIMDVEC_BACKEND")
            .ok()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());

        // Order matters: the override only ever removes what the target detector found.
        vec![
            Box::new(TargetFeatureDetector::from_env(nightly)),
            Box::new(EnvOverride { requested }),
        ]
    }

    fn detect_cpu_features(features: &mut [CpuFeature], nightly: bool) {
        for detector in Self::cpu_features_detectors(nightly) {
            if detector.is_applicable() {
                detector.detect_features(features);
            }
        }
    }

    fn apply(features: &mut [CpuFeature], force_emulation: bool) {
        // Sort features by priority (highest first)
        features.sort();

        // Find and use the highest detected feature (if any)
        // if no feature is detected, use fallback implementation
        let cfg_flag = features
            .iter()
            .filter(|_| !force_emulation)
            .find(|cpu_feature| cpu_feature.detected)
            .map(|cpu_feature| cpu_feature.cfg_flag)
            .unwrap_or("fallback");

        println!("cargo:rustc-cfg={cfg_flag}");
        println!("cargo:rustc-env=SIMDVEC_BACKEND_NAME={cfg_flag}");

        println!("cargo::rustc-check-cfg=cfg(avx512)");
        println!("cargo::rustc-check-cfg=cfg(avx2)");
        println!("cargo::rustc-check-cfg=cfg(sse)");
        println!("cargo::rustc-check-cfg=cfg(neon)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SIMDVEC_BACKEND");

    // Detect rustc channel (stable, beta, nightly)
    let rustc_channel = PlatformDetector::compiler_channel();

    // AVX-512 intrinsics are gated behind nightly features in this crate
    println!("cargo:rustc-cfg=rustc_channel=\"{rustc_channel}\"");
    println!("cargo::rustc-check-cfg=cfg(rustc_channel, values(\"nightly\", \"stable\"))");

    let nightly_build = rustc_channel == "nightly";
    let force_emulation = env::var_os("CARGO_FEATURE_FORCE_EMULATION").is_some();

    let mut features = CpuFeature::features();

    PlatformDetector::detect_cpu_features(&mut features, nightly_build);
    PlatformDetector::apply(&mut features, force_emulation);
}
