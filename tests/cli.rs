use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("costpick"))
}

#[test]
fn pick_prints_all_three_parameters() {
    bin()
        .arg("--maxtime")
        .arg("0.05")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"N = \d+\nr = \d+\np = \d+\n").unwrap());
}

#[test]
fn json_output_keeps_key_order() {
    bin()
        .arg("--maxtime")
        .arg("0.05")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r#"^\{"N":\d+,"r":\d+,"p":\d+\}\n$"#).unwrap());
}

#[test]
fn maxtime_is_required() {
    bin().assert().failure();
}

#[test]
fn non_positive_maxtime_is_rejected() {
    bin()
        .arg("--maxtime")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("maxtime must be greater than 0"));
}

#[test]
fn maxtime_can_come_from_the_environment() {
    bin()
        .env("COSTPICK_MAXTIME", "0.05")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""N":"#));
}

#[test]
fn memory_budgets_are_accepted() {
    bin()
        .arg("--maxtime")
        .arg("0.05")
        .arg("--maxmemfrac")
        .arg("0.25")
        .arg("--maxmem")
        .arg("16777216")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""r":"#));
}
