//! Printing varbinds and parsing the printed lines back into results.
//!
//! Every operation goes through both steps for each returned object, so a
//! large walk spends most of its non-network time here.

use std::hint::black_box;

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use easy_snmp::format::{FormatOptions, Printer};
use easy_snmp::{Mib, Oid, Value, VarBind, oid, parse_result, parse_results};

fn if_table(rows: u32) -> Vec<VarBind> {
    let mut out = Vec::new();
    for column in [1u32, 2, 3, 7, 10] {
        for row in 1..=rows {
            let oid = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1).child(column).child(row);
            let value = match column {
                2 => Value::OctetString(Bytes::from(format!("eth{}", row))),
                10 => Value::Counter32(row * 1000),
                _ => Value::Integer(row as i32),
            };
            out.push(VarBind::new(oid, value));
        }
    }
    out
}

fn bench_print(c: &mut Criterion) {
    let mib = Mib::builtin();
    let mut group = c.benchmark_group("print");

    for (name, options) in [
        ("symbolic", FormatOptions::default()),
        (
            "numeric",
            FormatOptions {
                numeric_oids: true,
                ..FormatOptions::default()
            },
        ),
    ] {
        let printer = Printer::new(&mib, options);
        let varbinds = if_table(64);
        group.throughput(Throughput::Elements(varbinds.len() as u64));
        group.bench_with_input(BenchmarkId::new("if_table", name), &varbinds, |b, vbs| {
            b.iter(|| {
                for vb in vbs {
                    black_box(printer.varbind(vb));
                }
            })
        });
    }

    let uptime = VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(8_640_123));
    let printer = Printer::new(&mib, FormatOptions::default());
    group.bench_function("timeticks", |b| b.iter(|| black_box(printer.varbind(&uptime))));

    let unknown = VarBind::new(
        Oid::new([1, 3, 6, 1, 4, 1, 9, 9, 13, 1, 3, 1, 3, 1005]),
        Value::Gauge32(42),
    );
    group.bench_function("unknown_oid", |b| b.iter(|| black_box(printer.varbind(&unknown))));

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_result");

    let lines = [
        ("integer", "IF-MIB::ifIndex.1 = INTEGER: 1"),
        ("string", "SNMPv2-MIB::sysDescr.0 = STRING: \"Linux agent 6.1.0\""),
        ("enum", "IF-MIB::ifAdminStatus.2 = INTEGER: up(1)"),
        (
            "timeticks",
            "DISMAN-EVENT-MIB::sysUpTimeInstance = Timeticks: (8640123) 1 day, 0:00:01.23",
        ),
        ("hex", "IF-MIB::ifPhysAddress.2 = Hex-STRING: 00 1A 2B 3C 4D 5E "),
        ("exception", "IF-MIB::ifDescr.9 = No Such Instance currently exists at this OID"),
    ];
    for (name, line) in lines {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| black_box(parse_result(line)))
        });
    }

    let mib = Mib::builtin();
    let printer = Printer::new(&mib, FormatOptions::default());
    let printed: Vec<String> = if_table(256).iter().map(|vb| printer.varbind(vb)).collect();
    group.throughput(Throughput::Elements(printed.len() as u64));
    group.bench_function("walk_output", |b| b.iter(|| black_box(parse_results(&printed))));

    group.finish();
}

criterion_group!(benches, bench_print, bench_parse);
criterion_main!(benches);
