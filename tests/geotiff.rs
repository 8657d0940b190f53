use std::path::Path;

use gdal::Dataset;
use gdal::raster::{GdalDataType, GdalType};
use ndarray::{Array2, array};

use geobridge::{
    Affine, Error, GeoTransform, Metadata, MetadataArray, MetadataValue, to_geotiff,
};

struct ReadBack<T> {
    size: (usize, usize),
    band_type: GdalDataType,
    values: Vec<T>,
    no_data: Option<f64>,
    geotransform: Option<[f64; 6]>,
}

fn read_back<T: GdalType + Copy>(path: &Path) -> ReadBack<T> {
    let ds = Dataset::open(path).unwrap();
    let (cols, rows) = ds.raster_size();
    let (cols, rows) = (cols as usize, rows as usize);
    let band = ds.rasterband(1).unwrap();
    let buf = band
        .read_as::<T>((0, 0), (cols, rows), (cols, rows), None)
        .unwrap();
    ReadBack {
        size: (cols, rows),
        band_type: band.band_type(),
        values: buf.data().to_vec(),
        no_data: band.no_data_value(),
        geotransform: ds.geo_transform().ok(),
    }
}

fn round_trip<T: GdalType + Copy + PartialEq + std::fmt::Debug>(
    data: Array2<T>,
    expected: GdalDataType,
) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.tif");
    let arr = MetadataArray::plain(data.clone());

    to_geotiff(&arr, None, &path).unwrap();

    let rb = read_back::<T>(&path);
    assert_eq!(rb.size, (data.ncols(), data.nrows()));
    assert_eq!(rb.band_type, expected);
    assert_eq!(rb.values, data.iter().copied().collect::<Vec<_>>());
}

#[test]
fn supported_types_round_trip() {
    round_trip(array![[1.5f32, -2.25, 3.0], [4.0, 5.5, 6.0]], GdalDataType::Float32);
    round_trip(array![[1.0e-12f64, 2.0], [3.0, 1.0e12]], GdalDataType::Float64);
    round_trip(array![[-32768i16, 0], [1, 32767]], GdalDataType::Int16);
    round_trip(array![[i32::MIN, 7, 8], [9, 10, i32::MAX]], GdalDataType::Int32);
}

#[test]
fn geotransform_and_no_data_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dem.tif");
    let dem = MetadataArray::with_no_data(array![[10.0f32, -9999.0], [12.0, 13.0]], -9999.0);
    let gt = GeoTransform::north_up(500_000.0, 4_200_000.0, 30.0, -30.0);

    to_geotiff(&dem, Some(&gt), &path).unwrap();

    let rb = read_back::<f32>(&path);
    assert_eq!(rb.no_data, Some(-9999.0));
    assert_eq!(
        rb.geotransform,
        Some([500_000.0, 30.0, 0.0, 4_200_000.0, 0.0, -30.0])
    );
}

#[test]
fn affine_transform_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("affine.tif");
    let arr = MetadataArray::plain(array![[1i32, 2], [3, 4]]);
    let aff = Affine::new(2.0, 0.0, 100.0, 0.0, -2.0, 50.0);

    to_geotiff(&arr, Some(&aff), &path).unwrap();

    let rb = read_back::<i32>(&path);
    assert_eq!(rb.geotransform, Some([100.0, 2.0, 0.0, 50.0, 0.0, -2.0]));
}

#[test]
fn metadata_without_no_data_entry_leaves_band_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags.tif");
    let mut md = Metadata::new();
    md.insert("source".to_string(), MetadataValue::Text("d8".to_string()));
    let arr = MetadataArray::new(array![[0i16, 1], [1, 0]], md);

    to_geotiff(&arr, None, &path).unwrap();

    assert_eq!(read_back::<i16>(&path).no_data, None);
}

#[test]
fn sliced_array_keeps_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slice.tif");
    let arr = MetadataArray::with_no_data(
        array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, -1.0]],
        -1.0,
    );
    let tail = arr.slice(ndarray::s![1.., 1..]);

    to_geotiff(&tail, None, &path).unwrap();

    let rb = read_back::<f64>(&path);
    assert_eq!(rb.size, (2, 2));
    assert_eq!(rb.values, vec![5.0, 6.0, 8.0, -1.0]);
    assert_eq!(rb.no_data, Some(-1.0));
}

#[test]
fn unsupported_type_fails_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bytes.tif");
    let arr = MetadataArray::plain(array![[1u8, 2], [3, 4]]);

    let err = to_geotiff(&arr, None, &path).unwrap_err();

    assert!(matches!(err, Error::UnsupportedType { .. }));
    assert!(!path.exists());
}
