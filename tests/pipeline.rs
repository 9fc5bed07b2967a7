use logprep::config::Config;
use logprep::geo::{GeoLookup, GeoResult};
use logprep::pipeline;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

struct StubGeo(HashMap<&'static str, (&'static str, &'static str)>);

impl GeoLookup for StubGeo {
    fn lookup(&self, ip: &str) -> GeoResult {
        match self.0.get(ip) {
            Some((city, country)) => GeoResult::Found {
                city: city.to_string(),
                country: country.to_string(),
            },
            None => GeoResult::NotFound,
        }
    }
}

fn stub_geo() -> StubGeo {
    StubGeo(HashMap::from([
        ("10.0.0.1", ("Seattle", "United States")),
        ("10.0.0.2", ("Berlin", "Germany")),
        ("10.0.0.4", ("Oslo", "Norway")),
    ]))
}

const INPUT: &str = "\
user_id,ip_address,event_type,timestamp,file_name,location,success,anomaly
alice,10.0.0.1,login,2024-03-04 15:30:00,,\"Seattle, USA\",true,false
bob,999.1.1.1,login,2024-03-04 16:00:00,,,true,
carol,10.0.0.2,file_access,2024-03-04 17:45:10,report.pdf,Berlin,1,0
dave,10.0.0.3,file_access,not-a-date,,,false,false
eve,,logout,2024-03-04 18:00:00,,,true,false
frank,203.0.113.9,upload,2024-03-05 09:15:00,notes.txt,\"Paris, France\",0,1
grace,10.0.0.4,file_access,2024-03-05 10:00:00,,,true,false
";

const EXPECTED: &str = "\
user,ip,action,timestamp,date,hour,day_of_week,file,city,country,geo_city,geo_country,success,anomaly
alice,10.0.0.1,login,2024-03-04 15:30:00,2024-03-04,15,0,N/A,Seattle,USA,Seattle,United States,true,false
carol,10.0.0.2,file_access,2024-03-04 17:45:10,2024-03-04,17,0,report.pdf,Berlin,,Berlin,Germany,true,false
frank,203.0.113.9,upload,2024-03-05 09:15:00,2024-03-05,9,1,notes.txt,Paris,France,,,false,true
grace,10.0.0.4,file_access,2024-03-05 10:00:00,2024-03-05,10,1,unknown,,,Oslo,Norway,true,false
";

fn config(dir: &Path) -> Config {
    let input = dir.join("events.csv");
    fs::write(&input, INPUT).unwrap();
    Config {
        input,
        output: dir
            .join("processed")
            .join("clean.csv")
            .to_string_lossy()
            .into_owned(),
        geodb: dir.join("missing.mmdb"),
    }
}

#[test]
fn cleans_and_enriches_a_batch() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());

    let summary = pipeline::run_with(&config, &stub_geo()).unwrap();
    assert_eq!(summary.report.before, 7);
    assert_eq!(summary.report.after, 4);
    assert_eq!(summary.written, 4);

    // parent directory of the output was created on demand
    let written = fs::read_to_string(&config.output).unwrap();
    assert_eq!(written, EXPECTED);
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());

    pipeline::run_with(&config, &stub_geo()).unwrap();
    let first = fs::read(&config.output).unwrap();
    pipeline::run_with(&config, &stub_geo()).unwrap();
    let second = fs::read(&config.output).unwrap();
    assert_eq!(first, second);
}

#[test]
fn output_has_no_empty_required_fields() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    pipeline::run_with(&config, &stub_geo()).unwrap();

    let written = fs::read_to_string(&config.output).unwrap();
    let mut lines = written.lines();
    let headers: Vec<&str> = lines.next().unwrap().split(',').collect();
    let required = [
        "user",
        "ip",
        "action",
        "timestamp",
        "file",
        "hour",
        "day_of_week",
        "date",
    ];
    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();
        for name in required {
            let idx = headers.iter().position(|h| *h == name).unwrap();
            assert!(!fields[idx].is_empty(), "{name} empty in {line}");
        }
    }
}

#[test]
fn missing_input_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        input: dir.path().join("does-not-exist.csv"),
        output: dir.path().join("clean.csv").to_string_lossy().into_owned(),
        geodb: dir.path().join("missing.mmdb"),
    };
    assert!(pipeline::run_with(&config, &stub_geo()).is_err());
    assert!(!Path::new(&config.output).exists());
}

#[test]
fn unreadable_geodb_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    // run() opens the real database reader; the path does not exist
    assert!(pipeline::run(&config).is_err());
    assert!(!Path::new(&config.output).exists());
}
