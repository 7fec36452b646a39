use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn nsat(workspace: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("nsat")?;
    cmd.env_remove("RUST_LOG")
        .arg("-w")
        .arg(workspace);
    Ok(cmd)
}

#[test]
fn init_creates_layout_and_refuses_second_run() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;

    nsat(tmp.path())?.args(["init", "--example"]).assert().success();
    assert!(tmp.path().join("nsat.toml").exists());
    assert!(tmp.path().join("params").join("network.toml").exists());
    assert!(tmp.path().join("results").is_dir());

    nsat(tmp.path())?.arg("init").assert().failure().code(1);
    nsat(tmp.path())?.args(["init", "--force"]).assert().success();
    Ok(())
}

#[test]
fn weights_generate_and_inspect() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;

    nsat(tmp.path())?
        .args(["weights", "generate", "--seed", "42"])
        .assert()
        .success();

    let params = tmp.path().join("params");
    for name in ["inp_exc", "exc_inh", "inh_exc"] {
        assert!(params.join(format!("{}.dat", name)).exists(), "{} missing", name);
    }

    let first_line = fs::read_to_string(params.join("exc_inh.dat"))?
        .lines()
        .next()
        .unwrap_or_default()
        .to_string();
    assert_eq!(first_line.split(' ').count(), 20);
    assert!(first_line
        .split(' ')
        .all(|v| v == "0.00" || v == "0.80"));

    nsat(tmp.path())?
        .args(["weights", "inspect", "params/inp_exc.dat", "--shape", "50x100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shape: 50x100"));

    nsat(tmp.path())?
        .args(["weights", "inspect", "params/inp_exc.dat", "--shape", "100x50"])
        .assert()
        .failure()
        .code(1);
    Ok(())
}

#[test]
fn weights_seed_is_reproducible() -> Result<(), Box<dyn Error>> {
    let a = tempdir()?;
    let b = tempdir()?;
    for dir in [&a, &b] {
        nsat(dir.path())?
            .args(["weights", "generate", "--preset", "matrix", "--seed", "7"])
            .assert()
            .success();
    }

    let read = |dir: &Path| fs::read_to_string(dir.join("params").join("visible2hidden.dat"));
    assert_eq!(read(a.path())?, read(b.path())?);
    assert!(read(a.path())?.lines().next().unwrap_or_default().contains("  "));
    Ok(())
}

#[test]
fn params_encode_and_inspect() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    fs::write(
        tmp.path().join("net.toml"),
        r#"
        [[input]]
        name = "input"
        num_neurons = 10
        destinations = ["excit"]
        params = { rate = 20.0 }

        [[nsat]]
        name = "excit"
        num_neurons = 100
        neuron_type = "excitatory_neuron"
        destinations = ["excit"]
        params = { v_th = 1.5, lambda = 0.25, is_set = true }
        "#,
    )?;

    nsat(tmp.path())?
        .args(["params", "encode", "net.toml", "--out-dir", "out"])
        .assert()
        .success();

    let out = tmp.path().join("out");
    let record = fs::read(out.join("excit.nsat"))?;
    assert_eq!(record.len(), 76);
    assert_eq!(&record[56..60], &0.25f32.to_le_bytes());
    assert_eq!(record[72], 1);
    assert_eq!(fs::read(out.join("input.spkg"))?.len(), 12);
    assert_eq!(
        fs::read_to_string(out.join("connections.txt"))?,
        "input excit\nexcit excit\n"
    );

    nsat(tmp.path())?
        .args(["params", "inspect", "out/excit.nsat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v_th @12 = 1.5"));

    nsat(tmp.path())?
        .args(["params", "inspect", "out/input.spkg", "--kind", "nsat"])
        .assert()
        .failure()
        .code(1);
    Ok(())
}

#[test]
fn params_encode_rejects_unknown_field() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    fs::write(
        tmp.path().join("net.toml"),
        "[[nsat]]\nname = \"a\"\nnum_neurons = 1\nparams = { v_threshold = 1.0 }\n",
    )?;

    nsat(tmp.path())?
        .args(["params", "encode", "net.toml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("v_threshold"));
    assert!(!tmp.path().join("params").join("a.nsat").exists());
    Ok(())
}
